//! Destination layout for a set of filtered files: which folder each file goes
//! to and what it will be called there. Building a plan touches no files; the
//! copy/move executor consumes it.

use crate::classify::{BucketClassifier, Criterion};
use crate::model::{sort_by_name, FileRecord};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Affixes applied to destination folders and file names.
///
/// The two `incremental_*` flags number files within their folder and also
/// number the innermost folders in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingOptions {
    pub folder_prefix: String,
    pub folder_suffix: String,
    pub filename_prefix: String,
    pub filename_suffix: String,
    pub incremental_prefix: bool,
    pub incremental_suffix: bool,
}

impl NamingOptions {
    fn numbered(&self) -> bool {
        self.incremental_prefix || self.incremental_suffix
    }

    /// Apply folder numbering then the folder prefix/suffix to a raw label.
    fn folder_name(&self, label: &str, number: Option<usize>) -> String {
        let numbered = match number {
            Some(n) if self.incremental_suffix => format!("{label}_{n:04}"),
            Some(n) if self.incremental_prefix => format!("{n:04}_{label}"),
            _ => label.to_string(),
        };
        format!("{}{}{}", self.folder_prefix, numbered, self.folder_suffix)
    }

    /// Final file name for the `position`-th (1-based) file in its folder.
    fn file_name(&self, name: &str, position: usize) -> String {
        let mut prefix = self.filename_prefix.clone();
        if self.incremental_prefix {
            prefix.push_str(&format!("{position:04}"));
        }
        let mut suffix = self.filename_suffix.clone();
        if self.incremental_suffix {
            suffix.push_str(&format!("{position:04}"));
        }

        let (base, dotted_ext) = match name.rfind('.') {
            Some(idx) => name.split_at(idx),
            None => (name, ""),
        };

        let mut out = String::with_capacity(name.len() + prefix.len() + suffix.len() + 2);
        if !prefix.is_empty() {
            out.push_str(&prefix);
            out.push('_');
        }
        out.push_str(base);
        if !suffix.is_empty() {
            out.push('_');
            out.push_str(&suffix);
        }
        out.push_str(dotted_ext);
        out
    }
}

/// Where one source file ends up, relative to the target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub source_path: String,
    /// Primary folder, then the secondary folder when there is one.
    pub folders: Vec<String>,
    pub file_name: String,
    /// `folders` and `file_name` joined with `/`.
    pub relative_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationPlan {
    pub entries: Vec<PlannedFile>,
}

impl OrganizationPlan {
    /// Plan the layout for `files`.
    ///
    /// Files are ranked by name (path breaks ties) before classification, so
    /// the plan does not depend on input order. `secondary` is ignored when
    /// the primary criterion is positional. Two files may end up with the same
    /// relative path; both are kept.
    pub fn build<'a, I>(
        classifier: &BucketClassifier,
        files: I,
        primary: &Criterion,
        secondary: Option<&Criterion>,
        naming: &NamingOptions,
    ) -> Self
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let secondary = secondary.filter(|_| !primary.is_positional());

        let mut primary_numbers: AHashMap<String, usize> = AHashMap::new();
        let mut secondary_numbers: AHashMap<String, AHashMap<String, usize>> = AHashMap::new();
        let mut folder_counts: AHashMap<String, usize> = AHashMap::new();
        let mut entries = Vec::new();

        for (index, file) in sort_by_name(files).into_iter().enumerate() {
            let primary_label = classifier.classify(file, primary, index);

            let folders = match secondary {
                Some(criterion) => {
                    let secondary_label = classifier.classify_unranked(file, criterion);
                    let number = naming.numbered().then(|| {
                        let numbers = secondary_numbers.entry(primary_label.clone()).or_default();
                        first_seen_number(numbers, &secondary_label)
                    });
                    let secondary_name = naming.folder_name(&secondary_label, number);
                    vec![primary_label, secondary_name]
                }
                None => {
                    let number = naming
                        .numbered()
                        .then(|| first_seen_number(&mut primary_numbers, &primary_label));
                    vec![naming.folder_name(&primary_label, number)]
                }
            };

            let folder = folders.join("/");
            let position = folder_counts.entry(folder.clone()).or_insert(0);
            *position += 1;

            let file_name = naming.file_name(&file.name, *position);
            let relative_path = format!("{folder}/{file_name}");
            entries.push(PlannedFile {
                source_path: file.path.clone(),
                folders,
                file_name,
                relative_path,
            });
        }

        debug!(
            "Planned {} file(s) into {} folder(s) by {}{}",
            entries.len(),
            folder_counts.len(),
            primary,
            secondary.map(|c| format!(" then {c}")).unwrap_or_default(),
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 1-based number of `label` in order of first appearance.
fn first_seen_number(numbers: &mut AHashMap<String, usize>, label: &str) -> usize {
    let next = numbers.len() + 1;
    *numbers.entry(label.to_string()).or_insert(next)
}

/// A top-level folder in the preview: files placed directly in it and, when a
/// secondary criterion is in use, its subfolders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewFolder {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub subfolders: BTreeMap<String, Vec<String>>,
}

/// Two-level view of a plan with folders and file names in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreviewTree {
    pub folders: BTreeMap<String, PreviewFolder>,
}

impl PreviewTree {
    pub fn from_plan(plan: &OrganizationPlan) -> Self {
        let mut folders: BTreeMap<String, PreviewFolder> = BTreeMap::new();

        for entry in &plan.entries {
            let Some((top, rest)) = entry.folders.split_first() else {
                continue;
            };
            let folder = folders.entry(top.clone()).or_default();
            match rest.first() {
                Some(sub) => folder
                    .subfolders
                    .entry(sub.clone())
                    .or_default()
                    .push(entry.file_name.clone()),
                None => folder.files.push(entry.file_name.clone()),
            }
        }

        for folder in folders.values_mut() {
            folder.files.sort();
            for files in folder.subfolders.values_mut() {
                files.sort();
            }
        }

        Self { folders }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;

    fn file(path: &str, size: u64) -> FileRecord {
        FileRecord::new(path, size, 1_700_000_000.0)
    }

    #[test]
    fn test_file_name_affixes() {
        let naming = NamingOptions {
            filename_prefix: "trip".to_string(),
            filename_suffix: "v".to_string(),
            incremental_suffix: true,
            ..Default::default()
        };
        assert_eq!(naming.file_name("beach.jpg", 3), "trip_beach_v0003.jpg");
        assert_eq!(naming.file_name("README", 1), "trip_README_v0001");
        assert_eq!(naming.file_name("a.tar.gz", 12), "trip_a.tar_v0012.gz");

        let numbered_only = NamingOptions {
            incremental_prefix: true,
            ..Default::default()
        };
        assert_eq!(numbered_only.file_name("x.txt", 7), "0007_x.txt");
        assert_eq!(NamingOptions::default().file_name("x.txt", 7), "x.txt");
    }

    #[test]
    fn test_folder_name_numbering() {
        let both = NamingOptions {
            folder_prefix: "[".to_string(),
            folder_suffix: "]".to_string(),
            incremental_prefix: true,
            incremental_suffix: true,
            ..Default::default()
        };
        // Suffix numbering wins when both flags are set.
        assert_eq!(both.folder_name("Audio", Some(2)), "[Audio_0002]");
        assert_eq!(both.folder_name("Audio", None), "[Audio]");
    }

    #[test]
    fn test_single_level_plan() {
        let classifier = BucketClassifier::default();
        let files = vec![
            file("/in/song.mp3", 1),
            file("/in/notes.txt", 1),
            file("/in/a.txt", 1),
        ];
        let plan = OrganizationPlan::build(
            &classifier,
            &files,
            &Criterion::Type,
            None,
            &NamingOptions::default(),
        );
        let paths: Vec<&str> = plan.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Documents/a.txt", "Documents/notes.txt", "Audio/song.mp3"]
        );
    }

    #[test]
    fn test_numbered_two_level_plan() {
        let classifier = BucketClassifier::default();
        let files = vec![
            file("/in/a.txt", 10),
            file("/in/b.txt", 200 * 1024),
            file("/in/c.txt", 20),
            file("/in/d.mp3", 20),
        ];
        let naming = NamingOptions {
            incremental_prefix: true,
            ..Default::default()
        };
        let plan = OrganizationPlan::build(
            &classifier,
            &files,
            &Criterion::Type,
            Some(&Criterion::Size),
            &naming,
        );
        let paths: Vec<&str> = plan.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "Documents/0001_Tiny (0 KB - 100 KB)/0001_a.txt",
                "Documents/0002_Small (100KB - 1MB)/0001_b.txt",
                "Documents/0001_Tiny (0 KB - 100 KB)/0002_c.txt",
                "Audio/0001_Tiny (0 KB - 100 KB)/0001_d.mp3",
            ]
        );
    }

    #[test]
    fn test_positional_primary_drops_secondary() {
        let classifier = BucketClassifier::new(ClassifierOptions {
            batch_size: 2,
            ..Default::default()
        });
        let files = vec![file("/in/a.txt", 1), file("/in/b.txt", 1), file("/in/c.txt", 1)];
        let plan = OrganizationPlan::build(
            &classifier,
            &files,
            &Criterion::FilesPerFolder,
            Some(&Criterion::Type),
            &NamingOptions::default(),
        );
        assert!(plan.entries.iter().all(|e| e.folders.len() == 1));
        assert_eq!(plan.entries[2].relative_path, "0003-0004/c.txt");
    }

    #[test]
    fn test_preview_tree_sorted() {
        let classifier = BucketClassifier::default();
        let files = vec![
            file("/in/zed.txt", 1),
            file("/in/alpha.txt", 1),
            file("/in/beat.mp3", 1),
        ];
        let plan = OrganizationPlan::build(
            &classifier,
            &files,
            &Criterion::Type,
            Some(&Criterion::Alphabet),
            &NamingOptions::default(),
        );
        let tree = PreviewTree::from_plan(&plan);
        let top: Vec<&str> = tree.folders.keys().map(String::as_str).collect();
        assert_eq!(top, vec!["Audio", "Documents"]);

        let docs = &tree.folders["Documents"];
        assert!(docs.files.is_empty());
        let subs: Vec<&str> = docs.subfolders.keys().map(String::as_str).collect();
        assert_eq!(subs, vec!["A", "Z"]);
        assert_eq!(docs.subfolders["Z"], vec!["zed.txt".to_string()]);
    }

    #[test]
    fn test_preview_tree_json_shape() {
        let classifier = BucketClassifier::default();
        let files = vec![file("/in/b.txt", 1), file("/in/a.txt", 1)];
        let plan = OrganizationPlan::build(
            &classifier,
            &files,
            &Criterion::Extension,
            None,
            &NamingOptions::default(),
        );
        let json = serde_json::to_value(PreviewTree::from_plan(&plan)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"TXT Files": {"files": ["a.txt", "b.txt"]}})
        );
    }
}
