use crate::utils::config::AppConfig;
use crate::utils::error::CustomError;
use actix_web_httpauth::extractors::bearer::BearerAuth;

/// Check the bearer token presented for a moderation procedure.
///
/// Moderation is disabled entirely when no `MODERATION_TOKEN` is configured.
pub fn authorize_moderator(
    config: &AppConfig,
    credentials: Option<&BearerAuth>,
) -> Result<(), CustomError> {
    let expected = config.moderation_token.as_deref().ok_or_else(|| {
        CustomError::UnauthorizedError("Moderation is not enabled".to_string())
    })?;

    let presented = credentials
        .map(|c| c.token())
        .ok_or_else(|| CustomError::UnauthorizedError("Missing moderation token".to_string()))?;

    if !tokens_match(presented.as_bytes(), expected.as_bytes()) {
        log::warn!("rejected moderation request with an invalid token");
        return Err(CustomError::UnauthorizedError(
            "Invalid moderation token".to_string(),
        ));
    }

    Ok(())
}

/// Comparison whose running time does not depend on where the inputs differ.
fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
