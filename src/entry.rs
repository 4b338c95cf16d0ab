use serde::{Deserialize, Serialize};

/// One gazette article as stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub published: String,
    pub id: String,
}

/// A feed item before normalization. Any field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawEntry {
    /// Returns `None` unless title, link and published are all present.
    pub fn into_entry(self) -> Option<Entry> {
        let title = non_empty(self.title)?;
        let link = non_empty(self.link)?;
        let published = non_empty(self.published)?;
        let id = non_empty(self.id).unwrap_or_else(|| link.clone());

        Some(Entry {
            title,
            link,
            published,
            id,
        })
    }
}

/// Keeps complete entries in feed order.
pub fn normalize(raw: Vec<RawEntry>) -> Vec<Entry> {
    raw.into_iter().filter_map(RawEntry::into_entry).collect()
}
