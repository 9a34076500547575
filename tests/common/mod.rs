use marketplace_service::config::{CorsConfig, HttpConfig, MarketplaceConfig, MongoConfig};
use marketplace_service::services::MarketplaceDb;
use marketplace_service::startup::{build_router, AppState, Application};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db: MarketplaceDb,
    pub db_name: String,
}

fn test_config(database: String) -> MarketplaceConfig {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    MarketplaceConfig {
        http: HttpConfig { port: 0 },
        mongodb: MongoConfig { uri, database },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("marketplace_test_{}", Uuid::new_v4());

        let app = Application::build(test_config(db_name.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_name,
        }
    }

    /// Drops the per-test database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

/// Builds the router over a client that never actually connects.
/// Suitable for exercising request paths that are rejected before any
/// store access happens.
pub async fn router_without_store() -> axum::Router {
    let config = test_config("marketplace_contract_test".to_string());
    let db = MarketplaceDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Client construction should not contact the server");

    build_router(AppState { config, db })
}

/// Builds the router over a client pointed at a port nothing listens
/// on, with a short selection timeout so store probes fail fast.
pub async fn router_with_unreachable_store() -> axum::Router {
    let mut config = test_config("marketplace_contract_test".to_string());
    config.mongodb.uri = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100".to_string();

    let db = MarketplaceDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Client construction should not contact the server");

    build_router(AppState { config, db })
}
