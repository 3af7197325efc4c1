use std::sync::Arc;

use crate::interaction::ledger::InteractionLedger;
use crate::interaction::model::{BookmarkState, VoteResult, VoteTally, VoteType};
use crate::utils::error::CustomError;

pub struct InteractionService {
    ledger: Arc<dyn InteractionLedger>,
}

impl InteractionService {
    pub fn new(ledger: Arc<dyn InteractionLedger>) -> Self {
        InteractionService { ledger }
    }

    pub async fn get_votes(&self, article_id: &str) -> Result<VoteTally, CustomError> {
        self.ledger.tally(article_id).await
    }

    pub async fn vote(
        &self,
        article_id: &str,
        voter_id: &str,
        vote_type: VoteType,
    ) -> Result<VoteResult, CustomError> {
        let tally = self.ledger.vote(article_id, voter_id, vote_type).await?;
        log::debug!(
            "vote {:?} on {} by {}, score now {}",
            vote_type,
            article_id,
            voter_id,
            tally.score
        );
        Ok(VoteResult { score: tally.score })
    }

    pub async fn get_user_vote(
        &self,
        article_id: &str,
        voter_id: &str,
    ) -> Result<VoteType, CustomError> {
        self.ledger.vote_of(article_id, voter_id).await
    }

    pub async fn get_bookmarks(&self, user_id: &str) -> Result<Vec<String>, CustomError> {
        self.ledger.bookmarks(user_id).await
    }

    pub async fn toggle_bookmark(
        &self,
        user_id: &str,
        article_id: &str,
    ) -> Result<BookmarkState, CustomError> {
        let bookmarked = self.ledger.toggle_bookmark(user_id, article_id).await?;
        Ok(BookmarkState { bookmarked })
    }

    pub async fn is_bookmarked(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError> {
        self.ledger.is_bookmarked(user_id, article_id).await
    }
}
