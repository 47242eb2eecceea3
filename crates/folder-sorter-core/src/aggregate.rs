use crate::classify::{BucketClassifier, Criterion};
use crate::model::{sort_by_name, FileRecord};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Count files per bucket label.
///
/// `files` must already be in the caller's ranking order: the position of each
/// file is its ordinal index. The result is sorted by count, largest first;
/// equal counts keep the order in which their labels first appeared.
pub fn aggregate<'a, I>(
    classifier: &BucketClassifier,
    files: I,
    criterion: &Criterion,
) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: AHashMap<String, usize> = AHashMap::new();

    for (index, file) in files.into_iter().enumerate() {
        let label = classifier.classify(file, criterion, index);
        match slots.get(&label) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    debug!("Aggregated into {} bucket(s) by {}", counts.len(), criterion);
    counts
}

/// Files whose bucket under `criterion` is `label`, in input order. Ranks come
/// from name order, the same ranking the preview and plan use.
pub fn files_in_bucket<'a>(
    classifier: &BucketClassifier,
    files: &[&'a FileRecord],
    criterion: &Criterion,
    label: &str,
) -> Vec<&'a FileRecord> {
    let ranked = sort_by_name(files.iter().copied());
    let members: AHashSet<&str> = ranked
        .iter()
        .enumerate()
        .filter(|(index, file)| classifier.classify(file, criterion, *index) == label)
        .map(|(_, file)| file.path.as_str())
        .collect();

    files
        .iter()
        .copied()
        .filter(|file| members.contains(file.path.as_str()))
        .collect()
}
