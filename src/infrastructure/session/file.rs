//! JSON file session storage

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{DomainError, SessionStorage, StoredSession};

/// Persists the session as a single JSON document
///
/// Writes go to a uniquely named sibling file that is then renamed over the
/// target, so a crash never leaves a half-written session behind.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<StoredSession>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read session file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            DomainError::storage(format!(
                "Corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn save(&self, session: &StoredSession) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| DomainError::storage(format!("Failed to serialize session: {}", e)))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write session: {}", e)))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp session file");
            }
            return Err(DomainError::storage(format!("Failed to write session: {}", e)));
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to remove session file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrganizationId, User, UserId};

    fn temp_storage() -> FileSessionStorage {
        let dir = std::env::temp_dir().join(format!("roster-session-{}", uuid::Uuid::new_v4()));
        FileSessionStorage::new(dir.join("nested").join("session.json"))
    }

    fn test_session() -> StoredSession {
        let user = User::new(UserId::new("user-1").unwrap(), "Ana", "Lopez", "ana@example.com")
            .with_organization(OrganizationId::new("org-1").unwrap());
        StoredSession::new("token-1", user)
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let storage = temp_storage();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = temp_storage();
        let session = test_session();

        storage.save(&session).await.unwrap();
        let loaded = storage.load().await.unwrap();

        assert_eq!(loaded, Some(session));

        let parent = storage.path.parent().unwrap();
        assert_eq!(file_names(parent).await, vec!["session.json".to_string()]);
    }

    async fn file_names(dir: &std::path::Path) -> Vec<String> {
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let storage = temp_storage();
        tokio::fs::create_dir_all(storage.path.join("occupied"))
            .await
            .unwrap();

        let error = storage.save(&test_session()).await.unwrap_err();

        assert!(matches!(error, DomainError::Storage { .. }));
        let parent = storage.path.parent().unwrap();
        assert_eq!(file_names(parent).await, vec!["session.json".to_string()]);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let storage = temp_storage();
        storage.save(&test_session()).await.unwrap();

        storage.clear().await.unwrap();
        storage.clear().await.unwrap();

        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let storage = temp_storage();
        tokio::fs::create_dir_all(storage.path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&storage.path, b"{not json").await.unwrap();

        let error = storage.load().await.unwrap_err();
        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
