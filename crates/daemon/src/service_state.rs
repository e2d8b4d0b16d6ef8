use std::sync::Arc;

use common::crypto::{CryptoProvider, SealedBoxProvider};
use url::Url;

use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// Everything a request handler needs: the store and the crypto provider
#[derive(Clone)]
pub struct State {
    database: Database,
    crypto: Arc<dyn CryptoProvider>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        Ok(Self::new(database, Arc::new(SealedBoxProvider)))
    }

    pub fn new(database: Database, crypto: Arc<dyn CryptoProvider>) -> Self {
        Self { database, crypto }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn crypto(&self) -> &dyn CryptoProvider {
        self.crypto.as_ref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}

impl axum::extract::FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}
