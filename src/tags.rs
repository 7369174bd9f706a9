use std::collections::HashSet;

/// Tag every exported note carries.
pub const CLIPPINGS_TAG: &str = "clippings";

/// Folder name Raindrop uses for bookmarks outside any collection.
const UNSORTED_FOLDER: &str = "unsorted";

/// Insertion-ordered set of tags. Re-inserting an existing tag is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the tag was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.seen.contains(&tag) {
            return false;
        }
        self.seen.insert(tag.clone());
        self.order.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.seen.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Lower-case and hyphenate a single tag or folder name.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "-")
}

/// Build the note's tag list: `clippings`, then the folder tag (unless the
/// folder is empty or "Unsorted"), then the comma-separated user tags.
pub fn format_tags(raw_tags: &str, folder: &str) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert(CLIPPINGS_TAG);

    let folder = folder.trim();
    if !folder.is_empty() && !folder.eq_ignore_ascii_case(UNSORTED_FOLDER) {
        tags.insert(normalize_tag(folder));
    }

    for piece in raw_tags.split(',') {
        if piece.trim().is_empty() {
            continue;
        }
        tags.insert(normalize_tag(piece));
    }

    tags
}
