use crate::utils::UNTITLED;
use serde::Deserialize;

/// One bookmark row from a Raindrop.io CSV backup.
///
/// Only the recognized columns are kept; anything else in the header is
/// ignored. A missing column and an empty cell both read as "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Record {
    pub title: Option<String>,
    pub url: Option<String>,
    pub excerpt: Option<String>,
    pub note: Option<String>,
    pub tags: Option<String>,
    pub folder: Option<String>,
    pub created: Option<String>,
    pub cover: Option<String>,
    pub highlights: Option<String>,
}

/// Recognized column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Url,
    Excerpt,
    Note,
    Tags,
    Folder,
    Created,
    Cover,
    Highlights,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Url,
        Field::Excerpt,
        Field::Note,
        Field::Tags,
        Field::Folder,
        Field::Created,
        Field::Cover,
        Field::Highlights,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Url => "url",
            Field::Excerpt => "excerpt",
            Field::Note => "note",
            Field::Tags => "tags",
            Field::Folder => "folder",
            Field::Created => "created",
            Field::Cover => "cover",
            Field::Highlights => "highlights",
        }
    }
}

impl Record {
    /// Trimmed value of `field`, or `""` when absent or whitespace-only.
    pub fn field(&self, field: Field) -> &str {
        let raw = match field {
            Field::Title => &self.title,
            Field::Url => &self.url,
            Field::Excerpt => &self.excerpt,
            Field::Note => &self.note,
            Field::Tags => &self.tags,
            Field::Folder => &self.folder,
            Field::Created => &self.created,
            Field::Cover => &self.cover,
            Field::Highlights => &self.highlights,
        };
        raw.as_deref().map(str::trim).unwrap_or("")
    }

    /// Title for display and file naming; `Untitled` when empty.
    pub fn display_title(&self) -> &str {
        match self.field(Field::Title) {
            "" => UNTITLED,
            t => t,
        }
    }

    /// Builder used by tests and callers constructing records by hand.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Url => &mut self.url,
            Field::Excerpt => &mut self.excerpt,
            Field::Note => &mut self.note,
            Field::Tags => &mut self.tags,
            Field::Folder => &mut self.folder,
            Field::Created => &mut self.created,
            Field::Cover => &mut self.cover,
            Field::Highlights => &mut self.highlights,
        };
        *slot = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_trimmed() {
        let r = Record::default().with(Field::Title, "  Hello world \n");
        assert_eq!(r.field(Field::Title), "Hello world");
    }

    #[test]
    fn absent_and_blank_fields_are_empty() {
        let r = Record::default().with(Field::Note, "   \t ");
        assert_eq!(r.field(Field::Note), "");
        for f in Field::ALL {
            assert_eq!(Record::default().field(f), "", "{}", f.name());
        }
    }

    #[test]
    fn display_title_defaults_to_untitled() {
        assert_eq!(Record::default().display_title(), "Untitled");
        let r = Record::default().with(Field::Title, " Rust ");
        assert_eq!(r.display_title(), "Rust");
    }
}
