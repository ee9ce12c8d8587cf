use std::str::FromStr;

use sqlx::{migrate::Migrator, sqlite::SqliteConnectOptions, SqlitePool};

#[derive(Clone)]
pub struct Database {
    storage: SqlitePool,
}

impl Database {
    pub fn new(url: &str) -> Self {
        let database_config = SqliteConnectOptions::from_str(url)
            .expect("Cannot connect to database")
            .create_if_missing(true)
            .foreign_keys(true);

        Self {
            storage: SqlitePool::connect_lazy_with(database_config),
        }
    }

    pub async fn run_migrations(&self) {
        Migrator::new(std::path::Path::new("./migrations/principal"))
            .await
            .expect("Where are the migrations?")
            .run(&self.storage)
            .await
            .expect("Migrations failed");
    }

    pub fn get_connection(&self) -> &SqlitePool {
        &self.storage
    }
}
