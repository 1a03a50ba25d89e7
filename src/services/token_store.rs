use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::{self, queries};

const TOKEN_KEY: &str = "auth_token";

/// Durable home of the optional bearer token. Cloning shares the connection.
#[derive(Clone)]
pub struct TokenStore {
    db: Arc<Mutex<Connection>>,
}

impl TokenStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::from_connection(db::init_db(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Blank tokens are reported as absent.
    pub fn token(&self) -> anyhow::Result<Option<String>> {
        let db = self.lock()?;
        let token = queries::get_setting(&db, TOKEN_KEY)?;
        Ok(token.filter(|t| !t.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> anyhow::Result<()> {
        let token = token.trim();
        let db = self.lock()?;
        if token.is_empty() {
            queries::delete_setting(&db, TOKEN_KEY)?;
        } else {
            queries::put_setting(&db, TOKEN_KEY, token)?;
        }
        Ok(())
    }

    /// Returns whether a token was present.
    pub fn clear_token(&self) -> anyhow::Result<bool> {
        let db = self.lock()?;
        queries::delete_setting(&db, TOKEN_KEY)
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))
    }
}
