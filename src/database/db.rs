use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};

pub struct MongoDatabase {
    pub database: Database,
}

impl MongoDatabase {
    pub async fn init(mongodb_uri: &str, database_name: &str) -> mongodb::error::Result<Self> {
        let mut client_options = ClientOptions::parse(mongodb_uri).await?;
        client_options.app_name = Some("newsroom-backend".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected successfully to MongoDB database {}", database_name);

        Ok(Self {
            database: client.database(database_name),
        })
    }
}

pub async fn connect_to_mongo(
    mongodb_uri: &str,
    database_name: &str,
) -> mongodb::error::Result<Database> {
    let mongo = MongoDatabase::init(mongodb_uri, database_name)
        .await
        .inspect_err(|e| log::error!("Failed to initialize database: {}", e))?;
    Ok(mongo.database)
}
