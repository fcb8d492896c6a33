use color_eyre::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::IntoFuture;
use std::path::Path;
use std::sync::Mutex;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

pub const TRANSCRIPT_KEY: &str = "transcript";
pub const SAVED_KEY: &str = "saved_messages";
pub const LANGUAGE_KEY: &str = "language";

/// Injectable durable state store. Business logic never touches the backing
/// database directly; each logical key holds one JSON payload.
pub trait ChatStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, payload: &str) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

impl<S: ChatStore + ?Sized> ChatStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, payload: &str) -> Result<()> {
        (**self).save(key, payload)
    }

    fn clear(&self, key: &str) -> Result<()> {
        (**self).clear(key)
    }
}

/// In-memory store for tests and storage-less deployments.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl ChatStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("memory store poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("memory store poisoned"))?;
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("memory store poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Durable store backed by embedded SurrealDB. The database API is async;
/// the store owns its own runtime and exposes the synchronous trait surface
/// through `block_on`.
pub struct SurrealStore {
    db: Surreal<Db>,
    runtime: tokio::runtime::Runtime,
}

#[derive(Debug, Deserialize)]
struct StateRow {
    payload: String,
}

impl SurrealStore {
    /// Returns the platform data-directory location for the database.
    pub fn default_path() -> Result<std::path::PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("", "", "fiqri-bot")
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine data directory"))?;
        Ok(proj_dirs.data_dir().join("fiqri-bot.db"))
    }

    /// Opens (or creates) the database at `path` and defines the state table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db_path = path.to_path_buf();
        let runtime = tokio::runtime::Runtime::new()?;
        let db = runtime.block_on(async {
            let db = Surreal::new::<RocksDb>(db_path).await?;
            db.use_ns("fiqri").use_db("chat").await?;
            db.query(
                "
                DEFINE TABLE IF NOT EXISTS state SCHEMAFULL;
                DEFINE FIELD payload ON state TYPE string;
                DEFINE FIELD updated_at ON state TYPE string;
            ",
            )
            .await?;
            Ok::<_, surrealdb::Error>(db)
        })?;

        Ok(Self { db, runtime })
    }
}

impl ChatStore for SurrealStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let mut response = self.runtime.block_on(
            self.db
                .query("SELECT payload FROM type::thing('state', $key)")
                .bind(("key", key.to_string()))
                .into_future(),
        )?;
        let rows: Vec<StateRow> = response.take(0)?;
        Ok(rows.into_iter().next().map(|row| row.payload))
    }

    fn save(&self, key: &str, payload: &str) -> Result<()> {
        self.runtime.block_on(
            self.db
                .query(
                    "UPSERT type::thing('state', $key)
                     SET payload = $payload, updated_at = $now",
                )
                .bind(("key", key.to_string()))
                .bind(("payload", payload.to_string()))
                .bind(("now", chrono::Local::now().to_rfc3339()))
                .into_future(),
        )?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.runtime.block_on(
            self.db
                .query("DELETE type::thing('state', $key)")
                .bind(("key", key.to_string()))
                .into_future(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::default();
        assert_eq!(store.load(TRANSCRIPT_KEY).unwrap(), None);

        store.save(TRANSCRIPT_KEY, "[1,2,3]").unwrap();
        assert_eq!(
            store.load(TRANSCRIPT_KEY).unwrap(),
            Some("[1,2,3]".to_string())
        );

        store.clear(TRANSCRIPT_KEY).unwrap();
        assert_eq!(store.load(TRANSCRIPT_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_keys_are_independent() {
        let store = MemoryStore::default();
        store.save(TRANSCRIPT_KEY, "[]").unwrap();
        store.save(SAVED_KEY, "[{}]").unwrap();

        store.clear(TRANSCRIPT_KEY).unwrap();
        assert_eq!(store.load(SAVED_KEY).unwrap(), Some("[{}]".to_string()));
    }

    #[test]
    fn test_default_path_lives_in_the_data_directory() {
        let path = SurrealStore::default_path().unwrap();
        assert!(path.ends_with("fiqri-bot.db"));
        let dirs = directories::ProjectDirs::from("", "", "fiqri-bot").unwrap();
        assert!(path.starts_with(dirs.data_dir()));
    }

    #[test]
    fn test_surreal_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "fiqri-bot-storage-test-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);

        {
            let store = SurrealStore::open(&path).expect("open store");
            store.save(LANGUAGE_KEY, "ja-JP").unwrap();
            store.save(TRANSCRIPT_KEY, "[]").unwrap();
            store.clear(TRANSCRIPT_KEY).unwrap();
        }

        {
            let store = SurrealStore::open(&path).expect("reopen store");
            assert_eq!(store.load(LANGUAGE_KEY).unwrap(), Some("ja-JP".to_string()));
            assert_eq!(store.load(TRANSCRIPT_KEY).unwrap(), None);
        }

        let _ = std::fs::remove_dir_all(&path);
    }
}
