use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{DomainError, SessionStorage, StoredSession};

/// Session storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    session: RwLock<Option<StoredSession>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn load(&self) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), DomainError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        *self.session.write().await = None;
        Ok(())
    }
}
