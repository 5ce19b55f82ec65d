//! Flat JSON persistence for the account document.
//!
//! The whole document is read once at startup and rewritten after every
//! mutation. Storage faults are logged and swallowed: the in-memory copy
//! stays authoritative.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info, warn};

use crate::followers::Profile;

/// The entire persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub accounts: HashMap<String, Account>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    /// Newest first.
    #[serde(default)]
    pub followers: Vec<Profile>,
    #[serde(
        rename = "created",
        default = "Utc::now",
        deserialize_with = "deserialize_created"
    )]
    pub created_at: DateTime<Utc>,
}

/// Accepts RFC 3339 as well as offset-less ISO 8601 timestamps (read as
/// UTC). A null creation time is replaced with the load time.
fn deserialize_created<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(Utc::now());
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| de::Error::custom(format!("invalid created timestamp {:?}: {}", raw, e)))
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            followers: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Handle to the JSON file backing a [`Document`].
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to an empty one on any failure.
    pub fn load(&self) -> Document {
        match self.read() {
            Ok(Some(doc)) => {
                info!(
                    path = %self.path.display(),
                    accounts = doc.accounts.len(),
                    "document loaded"
                );
                doc
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no document on disk, starting empty");
                Document::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "failed to load document: {:#}", e);
                Document::default()
            }
        }
    }

    /// Replace the file with `doc`. Failures are logged only.
    ///
    /// Serialization happens on the caller's task; the file work runs on
    /// the blocking pool.
    pub async fn save(&self, doc: &Document) {
        let result = match serde_json::to_vec_pretty(doc) {
            Ok(payload) => {
                let store = self.clone();
                tokio::task::spawn_blocking(move || store.write(&payload))
                    .await
                    .context("joining document write")
                    .and_then(|written| written)
            }
            Err(e) => Err(e).context("encoding document"),
        };

        match result {
            Ok(()) => debug!(path = %self.path.display(), "document saved"),
            Err(e) => error!(path = %self.path.display(), "failed to save document: {:#}", e),
        }
    }

    fn read(&self) -> Result<Option<Document>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let doc = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(doc))
    }

    fn write(&self, payload: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        tmp_file.write_all(payload)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        Ok(())
    }

    /// Sibling temp file so the final rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::followers::synth::generate_profiles;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("absent.json"));

        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn corrupt_file_loads_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_data.json");
        fs::write(&path, "{ not json").unwrap();

        let doc = Store::new(&path).load();
        assert!(doc.accounts.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("bot_data.json"));

        let mut doc = Document::default();
        let mut account = Account::new("Şule");
        account.followers = generate_profiles(25);
        doc.accounts.insert(account.name.clone(), account);
        doc.accounts
            .insert("empty".to_string(), Account::new("empty"));

        store.save(&doc).await;
        let loaded = store.load();

        assert_eq!(loaded, doc);
        assert_eq!(loaded.accounts["Şule"].followers.len(), 25);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_and_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("bot_data.json");
        let store = Store::new(&path);

        store.save(&Document::default()).await;

        assert!(path.exists());
        assert!(!temp_dir
            .path()
            .join("nested")
            .join(".bot_data.json.tmp")
            .exists());
    }

    #[tokio::test]
    async fn persisted_layout_uses_document_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("bot_data.json"));

        let mut doc = Document::default();
        let mut account = Account::new("demo");
        account.followers = generate_profiles(1);
        doc.accounts.insert("demo".to_string(), account);
        store.save(&doc).await;

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let account = &raw["accounts"]["demo"];
        assert!(account["created"].is_string());
        let follower = &account["followers"][0];
        for key in ["id", "name", "username", "bio", "avatar", "verified", "followers", "posts"] {
            assert!(follower.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn offset_less_timestamps_load_as_utc() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_data.json");
        fs::write(
            &path,
            r#"{"accounts":{
                "shop":{"name":"shop","followers":[],"created":"2024-05-01T12:30:00.123456"},
                "cafe":{"name":"cafe","followers":[],"created":"2024-05-02T08:00:00"}
            }}"#,
        )
        .unwrap();

        let doc = Store::new(&path).load();

        assert_eq!(doc.accounts.len(), 2);
        assert_eq!(
            doc.accounts["shop"].created_at.to_rfc3339(),
            "2024-05-01T12:30:00.123456+00:00"
        );
        assert_eq!(
            doc.accounts["cafe"].created_at.to_rfc3339(),
            "2024-05-02T08:00:00+00:00"
        );
    }

    #[test]
    fn missing_or_null_created_still_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_data.json");
        fs::write(
            &path,
            r#"{"accounts":{
                "a":{"name":"a","created":null},
                "b":{"name":"b","followers":[{"id":"1","name":"B"}]}
            }}"#,
        )
        .unwrap();

        let doc = Store::new(&path).load();

        assert_eq!(doc.accounts.len(), 2);
        assert_eq!(doc.accounts["b"].followers[0].username, "");
        assert!(!doc.accounts["b"].followers[0].verified);
    }
}
