// JSON file implementation of the local session store
use crate::application::session_store::{PersistedSession, SessionStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        let session = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(session).context("Failed to encode session")?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_replacing(&path, &bytes))
            .await
            .context("Session writer task failed")?
    }
}

/// Write through a uniquely named sibling temp file, then rename it over `path`.
/// Concurrent writers never share a temp file and readers never see a partial file.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::mutation::Role;
    use crate::domain::dashboard::Dashboard;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        let session = PersistedSession {
            dashboard: Some(Dashboard::empty_default()),
            role: Some(Role::Viewer),
        };

        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_concurrent_saves_leave_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));

        for round in 0..50 {
            let mut writers = tokio::task::JoinSet::new();
            for role in [Role::Viewer, Role::Editor, Role::Admin, Role::Editor] {
                let store = store.clone();
                let mut dashboard = Dashboard::empty_default();
                dashboard.name = format!("round {}", round);
                writers.spawn(async move {
                    store
                        .save(&PersistedSession {
                            dashboard: Some(dashboard),
                            role: Some(role),
                        })
                        .await
                });
            }
            while let Some(result) = writers.join_next().await {
                result.unwrap().unwrap();
            }

            let restored = store.load().await.unwrap().unwrap();
            assert_eq!(restored.dashboard.unwrap().name, format!("round {}", round));
        }

        let mut leftovers = std::fs::read_dir(dir.path()).unwrap();
        assert_eq!(leftovers.next().unwrap().unwrap().file_name(), "session.json");
        assert!(leftovers.next().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FileSessionStore::new(path);
        assert!(store.load().await.is_err());
    }
}
