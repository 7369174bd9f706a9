use crate::error::{ConvertError, Result};
use crate::record::Record;
use crate::renderer::Document;
use crate::source::load_records;
use crate::utils::{ConvertConfig, sanitize_filename};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Number of written files listed in the closing summary.
const LISTED_FILES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    Created,
    /// A file of the same name already existed and was replaced.
    Overwritten,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStatus {
    Done,
    /// The input could not be read, or the output directory not created.
    AbortedOnOpen,
}

/// Outcome of one conversion run.
#[derive(Debug)]
pub struct ConversionReport {
    pub status: BatchStatus,
    pub successful: usize,
    pub failed: usize,
    /// Successful writes that replaced an existing file.
    pub overwritten: usize,
    /// File names (not paths) written, in input order. May repeat on collisions.
    pub written: Vec<String>,
    /// Cause of an aborted batch.
    pub error: Option<ConvertError>,
}

impl ConversionReport {
    fn aborted(error: ConvertError) -> Self {
        Self {
            status: BatchStatus::AbortedOnOpen,
            successful: 0,
            failed: 1,
            overwritten: 0,
            written: Vec::new(),
            error: Some(error),
        }
    }

    /// Process exit code: 0 all converted, 1 nothing converted, 2 partial.
    pub fn exit_code(&self) -> u8 {
        match (self.successful, self.failed) {
            (_, 0) => 0,
            (0, _) => 1,
            _ => 2,
        }
    }

    pub fn print_summary(&self, output_dir: &Path) {
        println!();
        println!("Conversion complete!");
        println!("Successfully converted: {} files", self.successful);
        println!("Failed conversions: {}", self.failed);
        if self.overwritten > 0 {
            println!("Existing files overwritten: {}", self.overwritten);
        }

        if !self.written.is_empty() {
            println!("Files created or modified:");
            for name in self.written.iter().take(LISTED_FILES) {
                println!("- {}", output_dir.join(name).display());
            }
            if self.written.len() > LISTED_FILES {
                println!("... and {} more files", self.written.len() - LISTED_FILES);
            }
        }
    }
}

/// The main entry point for the conversion.
/// Reads the whole table, then writes one note per record.
pub fn execute(config: &ConvertConfig) -> ConversionReport {
    match run_internal(config) {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!(error = ?e, "conversion aborted");
            ConversionReport::aborted(e)
        }
    }
}

fn run_internal(config: &ConvertConfig) -> Result<ConversionReport> {
    let records = load_records(&config.input, config.delimiter)?;
    let total = records.len();

    fs::create_dir_all(&config.output_dir).map_err(|e| ConvertError::CreateOutputDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let pb = make_bar(total as u64, config.quiet);

    let mut report = ConversionReport {
        status: BatchStatus::Done,
        successful: 0,
        failed: 0,
        overwritten: 0,
        written: Vec::with_capacity(total),
        error: None,
    };

    for record in &records {
        match export_record(record, config, &pb) {
            Ok((filename, result)) => {
                report.successful += 1;
                if result == ProcessResult::Overwritten {
                    report.overwritten += 1;
                }
                report.written.push(filename);
            }
            Err(e) => {
                report.failed += 1;
                tracing::debug!(title = record.display_title(), error = ?e, "record failed");
                pb.suspend(|| {
                    eprintln!(
                        "Error processing row with title '{}': {}",
                        record.display_title(),
                        e
                    )
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(report)
}

fn make_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.suspend(|| {
        println!("Processing {} entries from CSV...", total);
        println!();
    });
    bar
}

fn export_record(
    record: &Record,
    config: &ConvertConfig,
    pb: &ProgressBar,
) -> Result<(String, ProcessResult)> {
    let filename = format!("{}.md", sanitize_filename(record.display_title()));
    let path = config.output_dir.join(&filename);

    let result_variant = if path.exists() {
        ProcessResult::Overwritten
    } else {
        ProcessResult::Created
    };

    let document = Document::from_record(record);
    write_document(&path, &document).map_err(|e| ConvertError::WriteDocument {
        path: path.clone(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "wrote note");
    if config.verbose {
        let label = match result_variant {
            ProcessResult::Created => "Created:    ",
            ProcessResult::Overwritten => "Overwritten:",
        };
        pb.suspend(|| println!("{} {}", label, filename));
    }

    Ok((filename, result_variant))
}

fn write_document(path: &Path, document: &Document) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    document.write_to(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(successful: usize, failed: usize) -> ConversionReport {
        ConversionReport {
            status: BatchStatus::Done,
            successful,
            failed,
            overwritten: 0,
            written: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(report(3, 0).exit_code(), 0);
        assert_eq!(report(0, 0).exit_code(), 0);
        assert_eq!(report(0, 4).exit_code(), 1);
        assert_eq!(report(2, 1).exit_code(), 2);
    }

    #[test]
    fn aborted_report_counts_one_failure() {
        let r = ConversionReport::aborted(ConvertError::SourceNotFound("x.csv".into()));
        assert_eq!(r.status, BatchStatus::AbortedOnOpen);
        assert_eq!((r.successful, r.failed), (0, 1));
        assert!(r.written.is_empty());
        assert!(r.error.is_some_and(|e| e.is_fatal()));
    }
}
