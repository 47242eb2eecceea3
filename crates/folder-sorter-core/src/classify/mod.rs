//! Bucket classification: maps a file and a criterion to a destination folder
//! label.
//!
//! Labels depend only on the file, the criterion, the file's rank in the
//! caller's ordering and the configured [`ClassifierOptions`]. The classifier
//! never sorts; callers that use the positional criteria (`files_per_folder`)
//! must pass ranks from a stable total order such as
//! [`crate::model::sort_by_name`].

mod categories;

pub use categories::{category_for_extension, OTHER_FILES, TYPE_CATEGORIES};

use crate::model::{FileMetadata, FileRecord, TimeBasis};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_PREFIX_LENGTH: usize = 3;

pub const NO_EXTENSION: &str = "No Extension";
pub const NON_ALPHA_BUCKET: &str = "#";
pub const EMPTY_PREFIX_BUCKET: &str = "---";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNKNOWN_DATE: &str = "Unknown Date";

pub const SIZE_TINY: &str = "Tiny (0 KB - 100 KB)";
pub const SIZE_SMALL: &str = "Small (100KB - 1MB)";
pub const SIZE_MEDIUM: &str = "Medium (1MB - 100MB)";
pub const SIZE_LARGE: &str = "Large (100MB plus)";

pub const DUPLICATES_NOT_SCANNED: &str = "Duplicates (Not Scanned)";
pub const DUPLICATE_FILES: &str = "Duplicate Files";
pub const UNIQUE_FILES: &str = "Unique Files";

/// Label for `files_per_folder` when no rank is available (secondary level).
pub const FILES_PER_FOLDER_UNRANKED: &str = "Files per Folder";

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";
const UNKNOWN_YEAR: &str = "Unknown Year";
const UNKNOWN_CAMERA: &str = "Unknown Camera";

/// Calendar granularity for the date criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    Year,
    YearMonth,
    YearMonthDay,
    MonthDay,
    Day,
}

impl DateFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yyyy" => Some(DateFormat::Year),
            "yyyy_mm" | "yyyy-mm" => Some(DateFormat::YearMonth),
            "yyyy_mm_dd" | "yyyy-mm-dd" => Some(DateFormat::YearMonthDay),
            "mm_dd" | "mm-dd" => Some(DateFormat::MonthDay),
            "dd" => Some(DateFormat::Day),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            DateFormat::Year => "yyyy",
            DateFormat::YearMonth => "yyyy_mm",
            DateFormat::YearMonthDay => "yyyy_mm_dd",
            DateFormat::MonthDay => "mm_dd",
            DateFormat::Day => "dd",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Year => "%Y",
            DateFormat::YearMonth => "%Y-%m",
            DateFormat::YearMonthDay => "%Y-%m-%d",
            DateFormat::MonthDay => "%m-%d",
            DateFormat::Day => "%d",
        }
    }

    pub fn format(self, datetime: &NaiveDateTime) -> String {
        datetime.format(self.pattern()).to_string()
    }
}

/// Strategy used to compute a bucket label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Criterion {
    Type,
    Extension,
    DateModified(DateFormat),
    DateCreated(DateFormat),
    Alphabet,
    Size,
    Duplicates,
    FilesPerFolder,
    FirstNChars,
    MusicArtist,
    MusicAlbum,
    MusicYear,
    MusicYearAlbum,
    VideoYear,
    PhotoCameraMakeModel,
    PhotoYearMonth,
    Unknown(String),
}

impl Criterion {
    /// Parse a secondary criterion, where `none` (or an empty string) means
    /// no second level.
    pub fn parse_optional(raw: &str) -> Option<Criterion> {
        match raw.trim() {
            "" | "none" => None,
            other => Some(Criterion::from(other)),
        }
    }

    /// Positional criteria take the whole folder layout; a secondary level is
    /// ignored beneath them.
    pub fn is_positional(&self) -> bool {
        matches!(self, Criterion::FilesPerFolder | Criterion::FirstNChars)
    }

    pub fn name(&self) -> String {
        match self {
            Criterion::Type => "type".to_string(),
            Criterion::Extension => "extension".to_string(),
            Criterion::DateModified(format) => format!("date_modified_{}", format.suffix()),
            Criterion::DateCreated(format) => format!("date_created_{}", format.suffix()),
            Criterion::Alphabet => "alphabet".to_string(),
            Criterion::Size => "size".to_string(),
            Criterion::Duplicates => "duplicates".to_string(),
            Criterion::FilesPerFolder => "files_per_folder".to_string(),
            Criterion::FirstNChars => "first_n_chars".to_string(),
            Criterion::MusicArtist => "music_artist".to_string(),
            Criterion::MusicAlbum => "music_album".to_string(),
            Criterion::MusicYear => "music_year".to_string(),
            Criterion::MusicYearAlbum => "music_year_album".to_string(),
            Criterion::VideoYear => "video_year".to_string(),
            Criterion::PhotoCameraMakeModel => "photo_camera_make_model".to_string(),
            Criterion::PhotoYearMonth => "photo_year_month".to_string(),
            Criterion::Unknown(raw) => raw.clone(),
        }
    }
}

impl From<&str> for Criterion {
    fn from(raw: &str) -> Self {
        if let Some(format) = raw.strip_prefix("date_modified_").and_then(DateFormat::parse) {
            return Criterion::DateModified(format);
        }
        if let Some(format) = raw.strip_prefix("date_created_").and_then(DateFormat::parse) {
            return Criterion::DateCreated(format);
        }
        match raw {
            "type" => Criterion::Type,
            "extension" => Criterion::Extension,
            "alphabet" => Criterion::Alphabet,
            "size" => Criterion::Size,
            "duplicates" => Criterion::Duplicates,
            "files_per_folder" => Criterion::FilesPerFolder,
            "first_n_chars" => Criterion::FirstNChars,
            "music_artist" => Criterion::MusicArtist,
            "music_album" => Criterion::MusicAlbum,
            "music_year" => Criterion::MusicYear,
            "music_year_album" => Criterion::MusicYearAlbum,
            "video_year" => Criterion::VideoYear,
            "photo_camera_make_model" => Criterion::PhotoCameraMakeModel,
            "photo_year_month" => Criterion::PhotoYearMonth,
            other => Criterion::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Criterion {
    fn from(raw: String) -> Self {
        Criterion::from(raw.as_str())
    }
}

impl From<Criterion> for String {
    fn from(criterion: Criterion) -> Self {
        criterion.name()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Parameters the labels depend on besides the file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Width of each `files_per_folder` range.
    pub batch_size: usize,
    /// Number of stem characters used by `first_n_chars`.
    pub prefix_length: usize,
    pub duplicates_scanned: bool,
    pub time_basis: TimeBasis,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            duplicates_scanned: false,
            time_basis: TimeBasis::Utc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BucketClassifier {
    options: ClassifierOptions,
}

impl BucketClassifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Label for the file at rank `index` (0-based) of the caller's ordering.
    pub fn classify(&self, file: &FileRecord, criterion: &Criterion, index: usize) -> String {
        self.label(file, criterion, Some(index))
    }

    /// Label computed without a rank, as used for the secondary level.
    pub fn classify_unranked(&self, file: &FileRecord, criterion: &Criterion) -> String {
        self.label(file, criterion, None)
    }

    fn label(&self, file: &FileRecord, criterion: &Criterion, index: Option<usize>) -> String {
        let basis = self.options.time_basis;
        match criterion {
            Criterion::Type => category_for_extension(file.extension()).to_string(),
            Criterion::Extension => match file.extension() {
                "" => NO_EXTENSION.to_string(),
                ext => format!("{} Files", ext.to_uppercase()),
            },
            Criterion::DateModified(format) => date_label(file.modified(basis), *format),
            Criterion::DateCreated(format) => date_label(file.created(basis), *format),
            Criterion::Alphabet => match file.name.chars().next() {
                Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
                _ => NON_ALPHA_BUCKET.to_string(),
            },
            Criterion::Size => size_label(file.size_kb()).to_string(),
            Criterion::Duplicates => {
                if !self.options.duplicates_scanned {
                    DUPLICATES_NOT_SCANNED.to_string()
                } else if file.is_duplicate == Some(true) {
                    DUPLICATE_FILES.to_string()
                } else {
                    UNIQUE_FILES.to_string()
                }
            }
            Criterion::FilesPerFolder => match index {
                Some(index) => batch_label(index, self.options.batch_size),
                None => FILES_PER_FOLDER_UNRANKED.to_string(),
            },
            Criterion::FirstNChars => {
                let prefix: String = file
                    .stem()
                    .chars()
                    .take(self.options.prefix_length.max(1))
                    .collect();
                if prefix.is_empty() {
                    EMPTY_PREFIX_BUCKET.to_string()
                } else {
                    prefix
                }
            }
            Criterion::MusicArtist => meta_or(file, |m| m.artist.as_deref(), UNKNOWN_ARTIST),
            Criterion::MusicAlbum => meta_or(file, |m| m.album.as_deref(), UNKNOWN_ALBUM),
            Criterion::MusicYear | Criterion::VideoYear => {
                meta_or(file, |m| m.year.as_deref(), UNKNOWN_YEAR)
            }
            Criterion::MusicYearAlbum => format!(
                "{} - {}",
                meta_or(file, |m| m.year.as_deref(), UNKNOWN_YEAR),
                meta_or(file, |m| m.album.as_deref(), UNKNOWN_ALBUM),
            ),
            Criterion::PhotoCameraMakeModel => {
                meta_or(file, |m| m.camera.as_deref(), UNKNOWN_CAMERA)
            }
            Criterion::PhotoYearMonth => meta_or(file, |m| m.year_month.as_deref(), UNKNOWN_DATE),
            Criterion::Unknown(_) => UNCATEGORIZED.to_string(),
        }
    }
}

fn date_label(datetime: Option<NaiveDateTime>, format: DateFormat) -> String {
    match datetime {
        Some(datetime) => format.format(&datetime),
        None => UNKNOWN_DATE.to_string(),
    }
}

fn size_label(size_kb: f64) -> &'static str {
    if size_kb < 100.0 {
        SIZE_TINY
    } else if size_kb < 1024.0 {
        SIZE_SMALL
    } else if size_kb < 102_400.0 {
        SIZE_MEDIUM
    } else {
        SIZE_LARGE
    }
}

/// `NNNN-MMMM` range containing the 0-based `index`, with 1-based bounds.
/// Bounds saturate at `usize::MAX` instead of overflowing.
fn batch_label(index: usize, batch_size: usize) -> String {
    let batch_size = batch_size.max(1);
    let start = (index / batch_size * batch_size).saturating_add(1);
    let end = start.saturating_add(batch_size - 1);
    format!("{:04}-{:04}", start, end)
}

/// Metadata field value, or `fallback` when the field is missing or empty.
fn meta_or<F>(file: &FileRecord, field: F, fallback: &str) -> String
where
    F: Fn(&FileMetadata) -> Option<&str>,
{
    file.metadata()
        .and_then(field)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileRecord {
        FileRecord::new(&format!("/src/{name}"), 10, 1_700_000_000.0)
    }

    #[test]
    fn test_criterion_names_round_trip() {
        for name in [
            "type",
            "extension",
            "date_modified_yyyy",
            "date_modified_yyyy_mm",
            "date_created_yyyy_mm_dd",
            "date_created_mm_dd",
            "date_created_dd",
            "alphabet",
            "size",
            "duplicates",
            "files_per_folder",
            "first_n_chars",
            "music_artist",
            "music_album",
            "music_year",
            "music_year_album",
            "video_year",
            "photo_camera_make_model",
            "photo_year_month",
        ] {
            let criterion = Criterion::from(name);
            assert!(!matches!(criterion, Criterion::Unknown(_)), "{name}");
            assert_eq!(criterion.name(), name);
        }
        assert_eq!(
            Criterion::from("date_modified_yyyy-mm"),
            Criterion::DateModified(DateFormat::YearMonth)
        );
        assert_eq!(
            Criterion::from("date_modified_week"),
            Criterion::Unknown("date_modified_week".to_string())
        );
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(Criterion::parse_optional("none"), None);
        assert_eq!(Criterion::parse_optional(""), None);
        assert_eq!(Criterion::parse_optional("size"), Some(Criterion::Size));
    }

    #[test]
    fn test_batch_label() {
        assert_eq!(batch_label(0, 100), "0001-0100");
        assert_eq!(batch_label(99, 100), "0001-0100");
        assert_eq!(batch_label(100, 100), "0101-0200");
        assert_eq!(batch_label(250, 100), "0201-0300");
        assert_eq!(batch_label(12_345, 1000), "12001-13000");
        assert_eq!(batch_label(3, 0), "0004-0004");
        assert_eq!(
            batch_label(0, usize::MAX),
            format!("0001-{}", usize::MAX)
        );
        assert_eq!(
            batch_label(usize::MAX, 1),
            format!("{}-{}", usize::MAX, usize::MAX)
        );
    }

    #[test]
    fn test_size_bands() {
        assert_eq!(size_label(0.0), SIZE_TINY);
        assert_eq!(size_label(99.9), SIZE_TINY);
        assert_eq!(size_label(100.0), SIZE_SMALL);
        assert_eq!(size_label(1024.0), SIZE_MEDIUM);
        assert_eq!(size_label(102_400.0), SIZE_LARGE);
    }

    #[test]
    fn test_alphabet() {
        let classifier = BucketClassifier::default();
        assert_eq!(classifier.classify(&file("zebra.png"), &Criterion::Alphabet, 0), "Z");
        assert_eq!(classifier.classify(&file("9lives.png"), &Criterion::Alphabet, 0), "#");
        assert_eq!(classifier.classify(&file("éclair.png"), &Criterion::Alphabet, 0), "#");
        assert_eq!(classifier.classify(&file("_x"), &Criterion::Alphabet, 0), "#");
    }

    #[test]
    fn test_first_n_chars() {
        let classifier = BucketClassifier::default();
        let c = Criterion::FirstNChars;
        assert_eq!(classifier.classify(&file("holiday.jpg"), &c, 0), "hol");
        assert_eq!(classifier.classify(&file("ab.jpg"), &c, 0), "ab");
        assert_eq!(classifier.classify(&file(".hidden"), &c, 0), "---");
        assert_eq!(classifier.classify(&file("日本語ファイル.txt"), &c, 0), "日本語");
    }

    #[test]
    fn test_huge_batch_size_does_not_overflow() {
        let classifier = BucketClassifier::new(ClassifierOptions {
            batch_size: usize::MAX,
            ..Default::default()
        });
        assert_eq!(
            classifier.classify(&file("a.txt"), &Criterion::FilesPerFolder, 0),
            format!("0001-{}", usize::MAX)
        );
    }

    #[test]
    fn test_files_per_folder_unranked() {
        let classifier = BucketClassifier::default();
        assert_eq!(
            classifier.classify_unranked(&file("a.txt"), &Criterion::FilesPerFolder),
            FILES_PER_FOLDER_UNRANKED
        );
    }

    #[test]
    fn test_empty_metadata_values_fall_back() {
        let classifier = BucketClassifier::default();
        let mut f = file("track.mp3");
        f.metadata = Some(FileMetadata {
            artist: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(
            classifier.classify(&f, &Criterion::MusicArtist, 0),
            "Unknown Artist"
        );
    }
}
