use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use tokio::sync::Mutex;

use crate::database::redis::RedisClient;
use crate::interaction::model::{VoteTally, VoteType};
use crate::utils::error::CustomError;

/// Vote and bookmark state keyed by opaque article, voter and user ids.
///
/// Keys are never checked against stored articles. Reading a key nobody has
/// written yields the empty state, never an error.
#[async_trait]
pub trait InteractionLedger: Send + Sync {
    async fn tally(&self, article_id: &str) -> Result<VoteTally, CustomError>;

    /// Replace the voter's vote on an article and return the new tally.
    async fn vote(
        &self,
        article_id: &str,
        voter_id: &str,
        vote_type: VoteType,
    ) -> Result<VoteTally, CustomError>;

    /// The vote a voter currently holds; `VoteType::None` when they hold none.
    async fn vote_of(&self, article_id: &str, voter_id: &str) -> Result<VoteType, CustomError>;

    async fn bookmarks(&self, user_id: &str) -> Result<Vec<String>, CustomError>;

    /// Flip membership and return whether the article is bookmarked afterwards.
    async fn toggle_bookmark(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError>;

    async fn is_bookmarked(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError>;
}

#[derive(Debug, Default)]
struct VoteEntry {
    upvoters: HashSet<String>,
    downvoters: HashSet<String>,
}

impl VoteEntry {
    fn tally(&self) -> VoteTally {
        VoteTally::new(self.upvoters.len() as u64, self.downvoters.len() as u64)
    }
}

/// Process-local ledger. Lost on restart and not shared between instances.
#[derive(Default)]
pub struct MemoryLedger {
    votes: Mutex<HashMap<String, VoteEntry>>,
    bookmarks: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InteractionLedger for MemoryLedger {
    async fn tally(&self, article_id: &str) -> Result<VoteTally, CustomError> {
        let votes = self.votes.lock().await;
        Ok(votes.get(article_id).map(VoteEntry::tally).unwrap_or_default())
    }

    async fn vote(
        &self,
        article_id: &str,
        voter_id: &str,
        vote_type: VoteType,
    ) -> Result<VoteTally, CustomError> {
        let mut votes = self.votes.lock().await;
        let entry = votes.entry(article_id.to_string()).or_default();

        entry.upvoters.remove(voter_id);
        entry.downvoters.remove(voter_id);
        match vote_type {
            VoteType::Up => {
                entry.upvoters.insert(voter_id.to_string());
            }
            VoteType::Down => {
                entry.downvoters.insert(voter_id.to_string());
            }
            VoteType::None => {}
        }

        Ok(entry.tally())
    }

    async fn vote_of(&self, article_id: &str, voter_id: &str) -> Result<VoteType, CustomError> {
        let votes = self.votes.lock().await;
        let state = match votes.get(article_id) {
            Some(entry) if entry.upvoters.contains(voter_id) => VoteType::Up,
            Some(entry) if entry.downvoters.contains(voter_id) => VoteType::Down,
            _ => VoteType::None,
        };
        Ok(state)
    }

    async fn bookmarks(&self, user_id: &str) -> Result<Vec<String>, CustomError> {
        let bookmarks = self.bookmarks.lock().await;
        Ok(bookmarks
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn toggle_bookmark(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError> {
        let mut bookmarks = self.bookmarks.lock().await;
        let set = bookmarks.entry(user_id.to_string()).or_default();
        if set.remove(article_id) {
            Ok(false)
        } else {
            set.insert(article_id.to_string());
            Ok(true)
        }
    }

    async fn is_bookmarked(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError> {
        let bookmarks = self.bookmarks.lock().await;
        Ok(bookmarks
            .get(user_id)
            .is_some_and(|set| set.contains(article_id)))
    }
}

const TOGGLE_MEMBER: &str = r"
if redis.call('SISMEMBER', KEYS[1], ARGV[1]) == 1 then
    redis.call('SREM', KEYS[1], ARGV[1])
    return 0
end
redis.call('SADD', KEYS[1], ARGV[1])
return 1
";

/// Ledger shared by every instance through Redis sets.
///
/// Keys: `votes:{article}:up`, `votes:{article}:down`, `bookmarks:{user}`.
#[derive(Clone)]
pub struct RedisLedger {
    connection: MultiplexedConnection,
}

fn redis_error(action: &str, e: redis::RedisError) -> CustomError {
    CustomError::InternalServerError(format!("Failed to {}: {}", action, e))
}

impl RedisLedger {
    pub fn new(client: &RedisClient) -> Self {
        Self {
            connection: client.get_connection(),
        }
    }

    fn vote_keys(article_id: &str) -> (String, String) {
        (
            format!("votes:{}:up", article_id),
            format!("votes:{}:down", article_id),
        )
    }

    fn bookmark_key(user_id: &str) -> String {
        format!("bookmarks:{}", user_id)
    }
}

#[async_trait]
impl InteractionLedger for RedisLedger {
    async fn tally(&self, article_id: &str) -> Result<VoteTally, CustomError> {
        let mut conn = self.connection.clone();
        let (up_key, down_key) = Self::vote_keys(article_id);

        let (upvotes, downvotes): (u64, u64) = redis::pipe()
            .atomic()
            .scard(&up_key)
            .scard(&down_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("read votes", e))?;

        Ok(VoteTally::new(upvotes, downvotes))
    }

    async fn vote(
        &self,
        article_id: &str,
        voter_id: &str,
        vote_type: VoteType,
    ) -> Result<VoteTally, CustomError> {
        let mut conn = self.connection.clone();
        let (up_key, down_key) = Self::vote_keys(article_id);

        // one MULTI/EXEC so readers never see the voter in neither or both sets
        let mut pipe = redis::pipe();
        pipe.atomic()
            .srem(&up_key, voter_id)
            .ignore()
            .srem(&down_key, voter_id)
            .ignore();
        match vote_type {
            VoteType::Up => {
                pipe.sadd(&up_key, voter_id).ignore();
            }
            VoteType::Down => {
                pipe.sadd(&down_key, voter_id).ignore();
            }
            VoteType::None => {}
        }
        pipe.scard(&up_key).scard(&down_key);

        let (upvotes, downvotes): (u64, u64) = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("record vote", e))?;

        Ok(VoteTally::new(upvotes, downvotes))
    }

    async fn vote_of(&self, article_id: &str, voter_id: &str) -> Result<VoteType, CustomError> {
        let mut conn = self.connection.clone();
        let (up_key, down_key) = Self::vote_keys(article_id);

        let (up, down): (bool, bool) = redis::pipe()
            .atomic()
            .sismember(&up_key, voter_id)
            .sismember(&down_key, voter_id)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("read vote", e))?;

        Ok(match (up, down) {
            (true, _) => VoteType::Up,
            (_, true) => VoteType::Down,
            _ => VoteType::None,
        })
    }

    async fn bookmarks(&self, user_id: &str) -> Result<Vec<String>, CustomError> {
        let mut conn = self.connection.clone();

        let mut members: Vec<String> = conn
            .smembers(Self::bookmark_key(user_id))
            .await
            .map_err(|e| redis_error("read bookmarks", e))?;
        members.sort();

        Ok(members)
    }

    async fn toggle_bookmark(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError> {
        let mut conn = self.connection.clone();

        let now_member: i64 = Script::new(TOGGLE_MEMBER)
            .key(Self::bookmark_key(user_id))
            .arg(article_id)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| redis_error("toggle bookmark", e))?;

        Ok(now_member == 1)
    }

    async fn is_bookmarked(&self, user_id: &str, article_id: &str) -> Result<bool, CustomError> {
        let mut conn = self.connection.clone();

        conn.sismember::<_, _, bool>(Self::bookmark_key(user_id), article_id)
            .await
            .map_err(|e| redis_error("read bookmark", e))
    }
}
