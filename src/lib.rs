mod decode;
mod error;
mod models;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context as _, Result};
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use encoding_rs::Encoding;
use num_format::{Locale, ToFormattedString};

use crate::decode::{encode_output, read_input, resolve_encoding};
use crate::error::DedupError;
use crate::models::*;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input file name
    input: PathBuf,
    /// Output file name (default: <input stem>_CLEANED<ext>, next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Column index or title to find duplicate values
    #[arg(short, long)]
    column: Option<ColumnSelector>,
    /// Column field delimiter (default: sniffed from the first line, falling back to ',')
    #[arg(short, long)]
    delimiter: Option<char>,
    /// Text quoting {0: minimal, 1: all, 2: non-numeric, 3: none}
    #[arg(short, long, default_value = "0")]
    quoting: QuotingMode,
    /// File encoding
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,
    /// Skip rows that are too short for the selected column instead of aborting
    #[arg(long)]
    index_ignore: bool,
    /// Write skipped rows to this file instead of discarding them
    #[arg(long)]
    output_ignored: Option<PathBuf>,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_CLEANED");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}

// Candidates are tried in order against the first line only.
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    for candidate in [b'|', b'\t', b';', b',', b' '] {
        if first_line.contains(candidate as char) {
            return candidate;
        }
    }
    b','
}

fn dedup_lines(text: &str, seen: &mut SeenSet, stats: &mut Stats) -> String {
    let mut output = String::new();
    for line in text.lines() {
        stats.total += 1;
        if seen.first_seen(line.to_string()) {
            stats.emitted += 1;
            output.push_str(line);
            output.push('\n');
        } else {
            stats.duplicates += 1;
        }
    }
    output
}

fn finish_writer(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush an in-memory csv buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("csv output was not valid UTF-8")
}

/// Runs the column-keyed pass. Returns the primary output and the rows that
/// failed the field lookup, both rendered with the configured quoting.
fn dedup_column(
    text: &str,
    selector: &ColumnSelector,
    delimiter: u8,
    quoting: QuotingMode,
    index_ignore: bool,
    seen: &mut SeenSet,
    stats: &mut Stats,
) -> Result<(String, String)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(quoting.reads_quotes())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(quoting.quote_style())
        .flexible(true)
        .from_writer(Vec::new());
    let mut ignored_writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(quoting.quote_style())
        .flexible(true)
        .from_writer(Vec::new());

    let mut records = reader.records();
    let header: StringRecord = match records.next() {
        Some(record) => record?,
        None => return Ok((String::new(), String::new())),
    };

    // The header is consumed to resolve the column. A name selector passes it
    // through as line 1 of the output; an index selector drops it.
    let column = match selector {
        ColumnSelector::Name(name) => {
            let index = header
                .iter()
                .position(|field| field == name.as_str())
                .ok_or_else(|| DedupError::ColumnResolution { name: name.clone() })?;
            writer.write_record(&header)?;
            index
        }
        ColumnSelector::Index(index) => *index,
    };

    for (offset, record) in records.enumerate() {
        let record = record?;
        stats.total += 1;

        // Stray copies of the header row (e.g. concatenated exports) are dropped.
        if record == header {
            stats.duplicates += 1;
            continue;
        }

        match record.get(column) {
            Some(value) => {
                if seen.first_seen(value.trim().to_string()) {
                    stats.emitted += 1;
                    writer.write_record(&record)?;
                } else {
                    stats.duplicates += 1;
                }
            }
            None => {
                let err = DedupError::FieldIndex {
                    row: offset as u64 + 2,
                    index: column,
                    len: record.len(),
                };
                if !index_ignore {
                    return Err(err.into());
                }
                stats.ignored += 1;
                ignored_writer.write_record(&record)?;
            }
        }
    }

    Ok((finish_writer(writer)?, finish_writer(ignored_writer)?))
}

fn write_output(path: &Path, text: &str, encoding: &'static Encoding) -> Result<()> {
    fs::write(path, encode_output(text, encoding))
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

pub fn run(args: Args) -> Result<()> {
    let encoding = resolve_encoding(&args.encoding)?;
    let text = read_input(&args.input, encoding)?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let delimiter = match args.delimiter {
        Some(c) => {
            ensure!(c.is_ascii(), "delimiter must be a single ASCII character");
            c as u8
        }
        None => sniff_delimiter(&text),
    };

    let mut seen = SeenSet::new();
    let mut stats = Stats::new();

    let (output, ignored) = match &args.column {
        None => (dedup_lines(&text, &mut seen, &mut stats), String::new()),
        Some(selector) => dedup_column(
            &text,
            selector,
            delimiter,
            args.quoting,
            args.index_ignore,
            &mut seen,
            &mut stats,
        )?,
    };

    debug_assert_eq!(seen.len() as u64, stats.emitted);

    write_output(&output_path, &output, encoding)?;
    if let Some(path) = &args.output_ignored {
        write_output(path, &ignored, encoding)?;
    }

    println!(
        "Read {} lines, dropped {} duplicates, kept {}.",
        stats.total.to_formatted_string(&Locale::en),
        stats.duplicates.to_formatted_string(&Locale::en),
        stats.emitted.to_formatted_string(&Locale::en),
    );
    if stats.ignored > 0 {
        println!(
            "Skipped {} rows too short for the selected column.",
            stats.ignored.to_formatted_string(&Locale::en),
        );
    }
    Ok(())
}
