use redis::Client;
use redis::aio::MultiplexedConnection;

/// Redis connection wrapper
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    pub async fn init(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        // fail at startup rather than on the first vote
        let mut probe = connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut probe).await?;

        log::info!("Connected successfully to Redis");

        Ok(Self { connection })
    }

    /// Multiplexed connections are cheap to clone; each caller gets its own handle.
    pub fn get_connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

pub async fn connect_to_redis(redis_url: &str) -> Result<RedisClient, redis::RedisError> {
    RedisClient::init(redis_url).await.inspect_err(|e| {
        log::error!("Failed to connect to Redis: {}", e);
    })
}
