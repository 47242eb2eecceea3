use crate::error::Error;
use crate::model::FileRecord;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duplicate flags remembered from an earlier scan of the same folder.
///
/// Serialized as a JSON array of `[path, flag]` pairs, where `flag` may be
/// `null` for files the scan could not hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateCache {
    entries: Vec<(String, Option<bool>)>,
}

impl DuplicateCache {
    /// Capture the flags currently carried by `files`.
    pub fn from_records<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        Self {
            entries: files
                .into_iter()
                .map(|file| (file.path.clone(), file.is_duplicate))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy cached flags onto the records whose path is in the cache. Records
    /// missing from the cache are left untouched. Returns how many records
    /// were updated.
    pub fn overlay(&self, files: &mut [FileRecord]) -> usize {
        let flags: AHashMap<&str, Option<bool>> = self
            .entries
            .iter()
            .map(|(path, flag)| (path.as_str(), *flag))
            .collect();

        let mut applied = 0;
        for file in files.iter_mut() {
            if let Some(flag) = flags.get(file.path.as_str()) {
                file.is_duplicate = *flag;
                applied += 1;
            }
        }
        debug!(
            "Applied cached duplicate flags to {} of {} files",
            applied,
            files.len()
        );
        applied
    }
}
