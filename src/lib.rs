//! # raindrop-clipper
//!
//! A CLI tool that converts a [Raindrop.io](https://raindrop.io) CSV backup into
//! Markdown notes in the format produced by the Obsidian Web Clipper.
//!
//! ## What it does
//!
//! Every row of the backup becomes one `<title>.md` file with YAML frontmatter
//! (`author`, `created`, `description`, `published`, `source`, `tags`, `title`)
//! followed by optional `Summary`, `Highlights` and `Source` sections. The
//! Raindrop folder becomes a tag, and every note is tagged `clippings`.
//!
//! The backup is read in full before anything is written: an unreadable file
//! produces no output at all. A row that fails to convert is reported and
//! skipped; the rest of the batch still runs.
//!
//! ## Usage
//!
//! ```sh
//! # Write notes to ./output
//! raindrop-clipper bookmarks.csv
//!
//! # Straight into a vault
//! raindrop-clipper bookmarks.csv ~/vault/Clippings
//! ```
//!
//! Preferences can be persisted in `~/.config/raindrop-clipper/config.toml`.
//!
//! Two bookmarks whose titles sanitize to the same name write the same file;
//! the later row wins.
pub mod error;
pub mod record;
pub mod renderer;
pub mod sequential;
pub mod source;
pub mod tags;
pub mod utils;

pub use error::{ConvertError, SourceError};
pub use record::{Field, Record};
pub use renderer::{Document, Frontmatter, render_record};
pub use sequential::{BatchStatus, ConversionReport, ProcessResult, execute};
pub use tags::{CLIPPINGS_TAG, TagSet, format_tags};
pub use utils::{ConvertConfig, extract_domain, format_date, parse_date, sanitize_filename};
