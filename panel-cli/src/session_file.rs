use std::fs;
use std::path::PathBuf;

use panel_core::{PersistedSession, SessionStorage};

/// Файл с сессией в рабочей директории; играет роль localStorage.
pub const SESSION_FILE: &str = ".panel_session";

#[derive(Debug, Clone)]
/// Долговременное хранилище сессии в JSON-файле.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileSessionStorage {
    fn default() -> Self {
        Self::new(SESSION_FILE)
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Option<PersistedSession> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, session: &PersistedSession) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(session)
            .map_err(|err| format!("не удалось сериализовать сессию: {err}"))?;
        fs::write(&self.path, raw).map_err(|err| format!("не удалось записать файл сессии: {err}"))
    }

    fn clear(&self) -> Result<(), String> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|err| format!("не удалось удалить файл сессии: {err}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_storage() -> FileSessionStorage {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos();
        FileSessionStorage::new(std::env::temp_dir().join(format!("panel_session_{nanos}.json")))
    }

    #[test]
    fn save_load_clear_round_trip() {
        let storage = temp_storage();
        assert!(storage.load().is_none());

        storage
            .save(&PersistedSession {
                user: None,
                token: "abc".to_string(),
                authenticated: true,
            })
            .expect("save must work");

        let loaded = storage.load().expect("session must load");
        assert_eq!(loaded.token, "abc");
        assert!(loaded.authenticated);

        storage.clear().expect("clear must work");
        assert!(storage.load().is_none());
    }

    #[test]
    fn clear_is_idempotent_when_file_is_missing() {
        let storage = temp_storage();
        assert!(storage.clear().is_ok());
        assert!(storage.clear().is_ok());
    }

    #[test]
    fn corrupted_file_reads_as_no_session() {
        let storage = temp_storage();
        fs::write(
            storage.path.clone(),
            "{not-json}",
        )
        .expect("write must work");
        assert!(storage.load().is_none());
        storage.clear().expect("clear must work");
    }
}
