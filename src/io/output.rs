//! Report writers for the CLI.

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::diagnostics::Category;
use crate::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// One analyzed file, ready for reporting.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub path: &'a Path,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

pub trait OutputWriter {
    fn write_reports(&mut self, reports: &[FileReport]) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_reports(&mut self, reports: &[FileReport]) -> anyhow::Result<()> {
        for report in reports {
            for diagnostic in &report.analysis.diagnostics {
                let rendered = diagnostic.to_string();
                let rendered = match diagnostic.category {
                    Category::Security => rendered.red(),
                    Category::Optimization => rendered.yellow(),
                };
                writeln!(self.writer, "{rendered}")?;
            }
            if report.analysis.diagnostics.is_empty() {
                let summary = format!("{}: no issues found", report.path.display());
                writeln!(self.writer, "{}", summary.green())?;
            } else {
                writeln!(
                    self.writer,
                    "{}: {} issue(s) found",
                    report.path.display(),
                    report.analysis.diagnostics.len()
                )?;
            }
        }
        Ok(())
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[FileReport]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(reports)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}
