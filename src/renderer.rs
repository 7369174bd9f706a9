use crate::record::{Field, Record};
use crate::tags::{TagSet, format_tags};
use crate::utils::{extract_domain, format_date};
use std::fmt;
use std::io::Write;

/// Metadata block of a note, in Obsidian Web Clipper field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub author: Option<String>,
    pub created: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub tags: TagSet,
    pub title: String,
}

impl Frontmatter {
    pub fn from_record(record: &Record) -> Self {
        let url = record.field(Field::Url);
        let excerpt = record.field(Field::Excerpt);
        let created = format_date(record.field(Field::Created));

        Self {
            author: extract_domain(url).map(|domain| format!("[[{domain}]]")),
            created: non_empty(created),
            description: non_empty(escape_description(excerpt)),
            source: non_empty(url.to_string()),
            tags: format_tags(record.field(Field::Tags), record.field(Field::Folder)),
            title: record.display_title().to_string(),
        }
    }

    fn push_lines(&self, lines: &mut Vec<String>) {
        lines.push("---".to_string());
        if let Some(author) = &self.author {
            lines.push("author:".to_string());
            lines.push(format!("- '{author}'"));
        }
        if let Some(created) = &self.created {
            lines.push(format!("created: '{created}'"));
        }
        if let Some(description) = &self.description {
            lines.push(format!("description: {description}"));
        }
        lines.push("published: ''".to_string());
        if let Some(source) = &self.source {
            lines.push(format!("source: {source}"));
        }
        lines.push("tags:".to_string());
        for tag in self.tags.iter() {
            lines.push(format!("- {tag}"));
        }
        lines.push(format!("title: {}", self.title));
        lines.push("---".to_string());
    }
}

/// A rendered note: metadata block followed by the optional body sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn from_record(record: &Record) -> Self {
        let frontmatter = Frontmatter::from_record(record);
        let excerpt = record.field(Field::Excerpt);
        let note = record.field(Field::Note);
        let highlights = record.field(Field::Highlights);
        let url = record.field(Field::Url);

        let mut lines = Vec::new();
        frontmatter.push_lines(&mut lines);

        if !excerpt.is_empty() || !note.is_empty() {
            push_heading(&mut lines, "Summary");
            if !excerpt.is_empty() {
                lines.push(excerpt.to_string());
            }
            if !note.is_empty() {
                if !excerpt.is_empty() {
                    lines.push(String::new());
                }
                lines.push(note.to_string());
            }
        }

        if !highlights.is_empty() {
            push_heading(&mut lines, "Highlights");
            lines.push(highlights.to_string());
        }

        if !url.is_empty() {
            push_heading(&mut lines, "Source");
            lines.push(format!("[View Original]({url})"));
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write the note without a trailing newline.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Render a record straight to Markdown text.
pub fn render_record(record: &Record) -> String {
    Document::from_record(record).to_string()
}

fn push_heading(lines: &mut Vec<String>, heading: &str) {
    lines.push(String::new());
    lines.push(format!("## {heading}"));
    lines.push(String::new());
}

// Single-line form for the `description:` key.
fn escape_description(excerpt: &str) -> String {
    excerpt
        .replace('"', "\\\"")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
