use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Tags supplied by the metadata extractor. Every field is optional; the
/// classifier substitutes an "Unknown ..." placeholder for missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(
        default,
        alias = "yearMonth",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_month: Option<String>,
}

/// One scanned file as delivered by the scan collaborator.
///
/// Timestamps are epoch seconds and may carry a fractional part. The record is
/// never modified by the engines; only [`crate::DuplicateCache::overlay`]
/// writes `is_duplicate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "lastModified")]
    pub last_modified: f64,
    #[serde(rename = "dateCreated", default)]
    pub date_created: Option<f64>,
    /// `None` until a duplicate scan has classified the file.
    #[serde(default, alias = "isDuplicate")]
    pub is_duplicate: Option<bool>,
    #[serde(default)]
    pub metadata: Option<FileMetadata>,
}

/// Which calendar the epoch timestamps are projected onto before a date is
/// compared or formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    #[default]
    Utc,
    Local,
}

impl TimeBasis {
    /// Convert epoch seconds to a calendar date-time. Returns `None` for
    /// non-finite or out-of-range timestamps.
    pub fn datetime(self, epoch_secs: f64) -> Option<NaiveDateTime> {
        if !epoch_secs.is_finite() {
            return None;
        }
        let whole = epoch_secs.floor();
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return None;
        }
        let nanos = (((epoch_secs - whole) * 1e9) as u32).min(999_999_999);
        let utc = DateTime::from_timestamp(whole as i64, nanos)?;
        Some(match self {
            TimeBasis::Utc => utc.naive_utc(),
            TimeBasis::Local => utc.with_timezone(&Local).naive_local(),
        })
    }
}

impl FileRecord {
    pub fn new(path: &str, size: u64, last_modified: f64) -> Self {
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_string();
        Self {
            path: path.to_string(),
            name,
            size,
            last_modified,
            date_created: None,
            is_duplicate: None,
            metadata: None,
        }
    }

    /// File name without its last extension. Names without a dot are returned
    /// whole.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }

    /// Text after the last dot, or an empty string when there is none.
    pub fn extension(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => "",
        }
    }

    /// Size in kilobytes (1024 bytes), fractional.
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    pub fn modified(&self, basis: TimeBasis) -> Option<NaiveDateTime> {
        basis.datetime(self.last_modified)
    }

    /// Creation date, falling back to the modification date when the scanner
    /// did not report one.
    pub fn created(&self, basis: TimeBasis) -> Option<NaiveDateTime> {
        match self.date_created {
            Some(created) => basis.datetime(created),
            None => self.modified(basis),
        }
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }
}

/// Order files by name, then by path, giving the stable total order the
/// position-dependent criteria rely on.
pub fn sort_by_name<'a, I>(files: I) -> Vec<&'a FileRecord>
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut sorted: Vec<&FileRecord> = files.into_iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    sorted
}
