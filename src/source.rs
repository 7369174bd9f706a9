//! Reading the Raindrop CSV export.

use crate::error::{ConvertError, Result, SourceError};
use crate::record::{Field, Record};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::Path;

/// Number of characters inspected when guessing the delimiter.
const SNIFF_SAMPLE_CHARS: usize = 1024;

/// Delimiters tried by [`sniff_delimiter`], in order of preference.
const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Guess the field delimiter from the start of a table.
///
/// A candidate wins if it appears the same non-zero number of times (outside
/// double quotes) on every complete line of the sample. Failing that, the
/// candidate most frequent on the header line is used, and finally `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (sample, truncated) = match text.char_indices().nth(SNIFF_SAMPLE_CHARS) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    };

    let mut lines = split_records(sample);
    // The last line of a cut sample is partial and would skew the counts.
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|l| !l.trim().is_empty());
    let Some(header) = lines.first() else {
        return b',';
    };

    for &cand in &CANDIDATES {
        let first = count_unquoted(header, cand);
        if first > 0 && lines.iter().all(|l| count_unquoted(l, cand) == first) {
            return cand;
        }
    }

    CANDIDATES
        .iter()
        .copied()
        .map(|c| (c, count_unquoted(header, c)))
        .filter(|&(_, n)| n > 0)
        // Earlier candidates win ties.
        .fold(None, |best: Option<(u8, usize)>, (c, n)| match best {
            Some((_, bn)) if bn >= n => best,
            _ => Some((c, n)),
        })
        .map(|(c, _)| c)
        .unwrap_or(b',')
}

// Split on newlines that are not inside a quoted field.
fn split_records(sample: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, ch) in sample.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                out.push(sample[start..i].trim_end_matches('\r'));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < sample.len() {
        out.push(&sample[start..]);
    }
    out
}

fn count_unquoted(line: &str, delim: u8) -> usize {
    let mut in_quotes = false;
    let mut n = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delim && !in_quotes {
            n += 1;
        }
    }
    n
}

/// Parse every record of `text`. Errors here make the whole table unusable.
pub fn parse_records(text: &str, delimiter: u8) -> std::result::Result<Vec<Record>, csv::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());
    let columns: Vec<&str> = recognized_columns(reader.headers()?)
        .into_iter()
        .map(Field::name)
        .collect();
    tracing::debug!(?columns, "recognized columns");
    reader.deserialize::<Record>().collect()
}

/// Recognized fields present in a header row, in [`Field::ALL`] order.
pub fn recognized_columns(headers: &StringRecord) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|f| headers.iter().any(|h| h == f.name()))
        .collect()
}

/// Read and parse the whole table before any output is produced.
pub fn load_records(path: &Path, delimiter: Option<u8>) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(ConvertError::SourceNotFound(path.to_path_buf()));
    }
    let unreadable = |source: SourceError| ConvertError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let text = fs::read_to_string(path).map_err(|e| unreadable(e.into()))?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&text));
    let records = parse_records(&text, delimiter).map_err(|e| unreadable(e.into()))?;

    tracing::debug!(
        path = %path.display(),
        delimiter = %char::from(delimiter).escape_default(),
        records = records.len(),
        "loaded input table"
    );
    Ok(records)
}
