use std::cmp::Reverse;
use std::collections::HashSet;

use crate::entry::Entry;
use crate::published::published_at;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Newest first.
    pub entries: Vec<Entry>,
    /// Fetched entries whose id was not already archived.
    pub added: usize,
}

/// Merges freshly fetched entries into the archived ones.
///
/// Archived entries always win: a fetched entry whose id is already stored
/// (or repeats an earlier fetched entry) is dropped, never used to update
/// the stored copy. Unique new entries go in front of the archive and the
/// result is stably sorted by publication date, newest first, so entries
/// with equal timestamps keep new-before-old order. Unparseable dates sort
/// last.
pub fn merge(new_entries: Vec<Entry>, old_entries: Vec<Entry>) -> MergeOutcome {
    let mut seen: HashSet<String> = old_entries.iter().map(|e| e.id.clone()).collect();

    let unique_new: Vec<Entry> = new_entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    let added = unique_new.len();

    let mut entries = unique_new;
    entries.extend(old_entries);
    entries.sort_by_cached_key(|e| Reverse(published_at(&e.published)));

    MergeOutcome { entries, added }
}
