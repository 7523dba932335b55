use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use docbox_core::BuildReport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub label: &'a str,
}

pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn entries(&self, out: &mut impl Write, entries: &[Entry<'_>]) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(entries)?)?,
            OutputFormat::Text => {
                let width = entries.iter().map(|entry| entry.key.len()).max().unwrap_or(0);
                for entry in entries {
                    writeln!(out, "{:width$}  {}", entry.key, entry.label)?;
                }
            }
        }
        Ok(())
    }

    pub fn build_report(&self, out: &mut impl Write, report: &BuildReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
            OutputFormat::Text => {
                for page in &report.pages {
                    writeln!(out, "rendered {}", page.display())?;
                }
                writeln!(
                    out,
                    "{} page(s) rendered, {} file(s) skipped",
                    report.pages.len(),
                    report.skipped
                )?;
            }
        }
        Ok(())
    }
}
