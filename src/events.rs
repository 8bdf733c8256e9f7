use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// One occurrence of a calendar event
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
pub(crate) struct Instance {
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) end: OffsetDateTime,
    #[serde(rename = "declined", default)]
    pub(crate) is_declined: bool,
}

impl Instance {
    /// Whether the instance takes place within `[start, end)`.  Instances
    /// without duration occupy the moment they start at.
    pub(crate) fn overlaps(&self, start: OffsetDateTime, end: OffsetDateTime) -> bool {
        if self.start == self.end {
            start <= self.start && self.start < end
        } else {
            self.start < end && start < self.end
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum QueryError {
    #[error("no permission to read calendar events")]
    PermissionDenied,
    #[error("calendar events unavailable: {0}")]
    Unavailable(String),
}

pub(crate) trait EventProvider {
    /// Returns every instance overlapping `[start, end)`
    fn query(&self, start: OffsetDateTime, end: OffsetDateTime)
        -> Result<Vec<Instance>, QueryError>;
}

/// Instances read from a JSON array in a file.  A missing file holds no
/// instances.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub(crate) fn new(path: PathBuf) -> JsonFileProvider {
        JsonFileProvider { path }
    }

    fn load(&self) -> Result<Vec<Instance>, QueryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no events file");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(QueryError::PermissionDenied);
            }
            Err(e) => return Err(QueryError::Unavailable(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "could not parse events file");
            QueryError::Unavailable(e.to_string())
        })
    }
}

impl EventProvider for JsonFileProvider {
    fn query(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Instance>, QueryError> {
        let mut instances = self.load()?;
        instances.retain(|i| i.overlaps(start, end));
        Ok(instances)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Provider returning a canned result
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub(crate) struct FixedProvider(pub(crate) Result<Vec<Instance>, QueryError>);

    impl EventProvider for FixedProvider {
        fn query(
            &self,
            start: OffsetDateTime,
            end: OffsetDateTime,
        ) -> Result<Vec<Instance>, QueryError> {
            let mut instances = self.0.clone()?;
            instances.retain(|i| i.overlaps(start, end));
            Ok(instances)
        }
    }
}
