use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Identifier of the preference store; the JSON file is named after it
pub(crate) const STORE_ID: &str = "mincal_prefs";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum StoredValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Edit {
    Put(&'static str, StoredValue),
    Remove(&'static str),
}

/// Persistent key-value storage underneath the preferences.
pub(crate) trait KeyValueStore {
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Applies all of `edits` as a single commit: either every edit is
    /// persisted or none is.
    fn commit(&mut self, edits: &[Edit]) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to read preferences from {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write preferences to {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize preferences")]
    Serialize(#[from] serde_json::Error),
}

/// Preferences kept as a flat JSON object in a single file.  Every commit
/// rewrites the file through a temporary file and a rename.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, StoredValue>,
}

impl JsonFileStore {
    pub(crate) fn open(path: PathBuf) -> Result<JsonFileStore, StoreError> {
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring unparseable preference file"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        debug!(path = %path.display(), keys = values.len(), "opened preference store");
        Ok(JsonFileStore { path, values })
    }

    /// Like [`JsonFileStore::open`], but a file that cannot be read leaves
    /// every preference at its default
    pub(crate) fn open_or_default(path: PathBuf) -> JsonFileStore {
        match JsonFileStore::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read preferences; using defaults"
                );
                JsonFileStore {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    fn write(&self, values: &BTreeMap<String, StoredValue>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values.get(key).cloned()
    }

    fn commit(&mut self, edits: &[Edit]) -> Result<(), StoreError> {
        let mut values = self.values.clone();
        apply_edits(&mut values, edits);
        self.write(&values)?;
        self.values = values;
        Ok(())
    }
}

fn apply_edits(values: &mut BTreeMap<String, StoredValue>, edits: &[Edit]) {
    for edit in edits {
        match edit {
            Edit::Put(key, value) => {
                values.insert((*key).to_owned(), value.clone());
            }
            Edit::Remove(key) => {
                values.remove(*key);
            }
        }
    }
}
