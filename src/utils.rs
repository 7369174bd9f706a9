use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::{Host, Url};

/// Configuration required to run a conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Field delimiter; sniffed from the file when `None`.
    pub delimiter: Option<u8>,
    pub verbose: bool,
    pub quiet: bool,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            delimiter: None,
            verbose: false,
            quiet: false,
        }
    }
}

pub const UNTITLED: &str = "Untitled";

/// Longest file stem produced by [`sanitize_filename`], in characters.
pub const MAX_FILENAME_LEN: usize = 250;

static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-_.,()\[\]{}#@&+=!~]").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turn an arbitrary title into a file stem that is safe on every platform.
///
/// Never empty, never longer than [`MAX_FILENAME_LEN`] characters, and free of
/// `< > : " / \ | ? *`.
pub fn sanitize_filename(title: &str) -> String {
    if title.trim().is_empty() {
        return UNTITLED.to_string();
    }

    let name = RESERVED_CHARS.replace_all(title, "");
    let name = DISALLOWED_CHARS.replace_all(&name, "");
    let name = WHITESPACE_RUN.replace_all(&name, " ");
    let mut name = name.trim().to_string();

    if name.chars().count() > MAX_FILENAME_LEN {
        name = name
            .chars()
            .take(MAX_FILENAME_LEN)
            .collect::<String>()
            .trim_end()
            .to_string();
    }

    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// Host of `url` without a leading `www.`; `None` for empty or unparsable input.
///
/// Internationalized hosts come back in Unicode form, not punycode.
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    let host = match parsed.host()? {
        Host::Domain(domain) => idna::domain_to_unicode(domain).0,
        ip => ip.to_string(),
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Calendar date of an ISO-8601 timestamp, in the timestamp's own offset.
pub fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();
    if ts.is_empty() {
        return None;
    }
    let ts = match ts.strip_suffix('Z').or_else(|| ts.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => ts.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&ts) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&ts, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&ts, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(&ts, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` for a parsable timestamp, otherwise `""`.
pub fn format_date(timestamp: &str) -> String {
    parse_date(timestamp)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_is_not_quiet() {
        let config = ConvertConfig::new("in.csv", "out");
        assert!(!config.quiet);
        assert!(!config.verbose);
        assert_eq!(config.delimiter, None);
    }

    #[test]
    fn sanitize_empty_is_untitled() {
        assert_eq!(sanitize_filename(""), "Untitled");
        assert_eq!(sanitize_filename("   \n"), "Untitled");
        assert_eq!(sanitize_filename("???***"), "Untitled");
        assert_eq!(sanitize_filename("☃ ♥"), "Untitled");
    }

    #[test]
    fn sanitize_strips_reserved_chars() {
        let out = sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#);
        assert_eq!(out, "abcdefghij");
        for c in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
            assert!(!out.contains(c));
        }
    }

    #[test]
    fn sanitize_keeps_allowed_punctuation() {
        assert_eq!(
            sanitize_filename("Rust (2024) [draft] {x} #1 @me & you + = ! ~ a_b-c.d,e"),
            "Rust (2024) [draft] {x} #1 @me & you + = ! ~ a_b-c.d,e"
        );
    }

    #[test]
    fn sanitize_collapses_whitespace_and_drops_symbols() {
        assert_eq!(sanitize_filename("  What's   new\tin\nRust?  "), "Whats new in Rust");
        assert_eq!(sanitize_filename("Café — résumé"), "Café résumé");
    }

    #[test]
    fn sanitize_truncates_to_limit() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_filename(&long).chars().count(), MAX_FILENAME_LEN);

        // Trailing whitespace exposed by truncation is trimmed.
        let spaced = format!("{} {}", "b".repeat(249), "c".repeat(20));
        assert_eq!(sanitize_filename(&spaced), "b".repeat(249));

        let wide = "é".repeat(400);
        assert_eq!(sanitize_filename(&wide).chars().count(), MAX_FILENAME_LEN);
    }

    #[test]
    fn domain_strips_www() {
        assert_eq!(
            extract_domain("https://www.example.com/a/b").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            extract_domain("http://blog.rust-lang.org:8080/x?y=1").as_deref(),
            Some("blog.rust-lang.org")
        );
    }

    #[test]
    fn domain_keeps_unicode_hosts() {
        assert_eq!(
            extract_domain("https://www.bücher.de/x").as_deref(),
            Some("bücher.de")
        );
        assert_eq!(
            extract_domain("https://xn--bcher-kva.de/").as_deref(),
            Some("bücher.de")
        );
        assert_eq!(
            extract_domain("http://[::1]:8080/").as_deref(),
            Some("[::1]")
        );
        assert_eq!(
            extract_domain("http://127.0.0.1/x").as_deref(),
            Some("127.0.0.1")
        );
    }

    #[test]
    fn domain_of_garbage_is_none() {
        assert_eq!(extract_domain(""), None);
        assert_eq!(extract_domain("   "), None);
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain("example.com/path"), None);
        assert_eq!(extract_domain("mailto:someone@example.com"), None);
        assert_eq!(extract_domain("http://[::1"), None);
    }

    #[test]
    fn date_from_utc_timestamp() {
        assert_eq!(format_date("2023-05-01T12:00:00Z"), "2023-05-01");
        assert_eq!(format_date("2023-05-01T12:00:00.123Z"), "2023-05-01");
    }

    #[test]
    fn date_keeps_own_offset() {
        assert_eq!(format_date("2023-05-01T23:30:00-05:00"), "2023-05-01");
        assert_eq!(format_date("2023-05-01 08:15:00"), "2023-05-01");
        assert_eq!(format_date("2023-05-01"), "2023-05-01");
    }

    #[test]
    fn date_garbage_is_empty() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("yesterday"), "");
        assert_eq!(format_date("2023-13-45T00:00:00Z"), "");
    }
}
