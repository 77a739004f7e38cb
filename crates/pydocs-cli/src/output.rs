//! Console and file output for result tables.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use pydocs_core::{Mode, ResultTable};
use unicode_width::UnicodeWidthStr;

const FILE_DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table on stdout
    Pretty,
    /// CSV file in the results directory
    File,
}

/// Send a table to the output selected on the command line. Without a
/// format each row is printed as space-separated fields.
pub fn control_output(
    table: &ResultTable,
    format: Option<OutputFormat>,
    mode: Mode,
    results_dir: &Path,
) -> Result<()> {
    match format {
        None => write_plain(&mut io::stdout().lock(), table)?,
        Some(OutputFormat::Pretty) => {
            io::stdout().lock().write_all(render_pretty(table).as_bytes())?;
        }
        Some(OutputFormat::File) => {
            file_output(table, mode, results_dir, Local::now())?;
        }
    }
    Ok(())
}

pub fn write_plain<W: Write>(out: &mut W, table: &ResultTable) -> io::Result<()> {
    for row in table.all_rows() {
        writeln!(out, "{}", row.join(" "))?;
    }
    Ok(())
}

/// Left-aligned table with `+---+` borders and the header boxed on top.
pub fn render_pretty(table: &ResultTable) -> String {
    let mut widths: Vec<usize> = vec![0; table.width()];
    for row in table.all_rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    let render_row = |row: &[String]| {
        let mut line = String::from("|");
        for (cell, width) in row.iter().zip(&widths) {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(width - cell.width() + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&render_row(table.header()));
    out.push_str(&border);
    for row in table.rows() {
        out.push_str(&render_row(row));
    }
    if !table.is_empty() {
        out.push_str(&border);
    }
    out
}

/// Every field quoted, `\n` line endings.
pub fn write_csv<W: Write>(out: W, table: &ResultTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    for row in table.all_rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table to `<results_dir>/<mode>_<timestamp>.csv`.
pub fn file_output(
    table: &ResultTable,
    mode: Mode,
    results_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("Failed to create {}", results_dir.display()))?;
    let path = results_dir.join(format!("{}_{}.csv", mode, now.format(FILE_DATETIME_FORMAT)));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, table)?;
    tracing::info!("Results saved to {}", path.display());
    Ok(path)
}
