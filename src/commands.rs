//! The three host-facing commands: scan, graph, depresolve.
//!
//! Each reads its JSON input (if any) from stdin and writes one JSON
//! document to stdout. The pure halves take explicit inputs so they can be
//! tested without a process.

use std::io::{Read as _, Write as _};
use std::path::Path;

use crate::command_table::CommandTable;
use crate::config::Config;
use crate::error::Error;
use crate::graph::{self, GraphBuilder, GraphOptions};
use crate::paths::{PathNormalizer, resolve_symlinks};
use crate::scanner;
use crate::types::{GraphOutput, MAN_PAGES, Resolution, SourceUnit};

/// Decode a graph request: an array of units, or a single unit as a
/// fallback for older hosts.
///
/// # Errors
///
/// Returns `Error::InputDecode` if neither shape parses.
pub fn decode_units(input: &[u8]) -> Result<Vec<SourceUnit>, Error> {
    let array_err = match serde_json::from_slice::<Vec<SourceUnit>>(input) {
        Ok(units) => return Ok(units),
        Err(e) => e,
    };
    return match serde_json::from_slice::<Option<SourceUnit>>(input) {
        Ok(single) => Ok(single.into_iter().collect()),
        Err(_single_err) => Err(Error::InputDecode {
            reason: array_err.to_string(),
        }),
    };
}

/// Read stdin and report the dependency on the man page corpus.
///
/// # Errors
///
/// Returns errors from reading stdin, decoding, or writing stdout.
pub fn depresolve() -> Result<(), Error> {
    let input = read_stdin()?;
    let unit: SourceUnit = serde_json::from_slice(&input).map_err(|e| {
        return Error::InputDecode { reason: e.to_string() };
    })?;
    let resolutions = resolve_dependencies(&unit);
    return write_pretty(&resolutions);
}

/// Read units from stdin, graph them, and write the result to stdout.
///
/// # Errors
///
/// Returns errors from reading stdin, decoding, graphing, or writing stdout.
pub fn graph(root: &Path, config: &Config) -> Result<(), Error> {
    let input = read_stdin()?;
    let units = decode_units(&input)?;
    let table = CommandTable::posix();
    tracing::debug!(commands = table.len(), "loaded command table");
    let output = graph_units(root, config, &table, &units)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &output)?;
    writeln!(stdout)?;
    stdout.flush()?;
    return Ok(());
}

/// Builder switches derived from the project config.
const fn graph_options(config: &Config) -> GraphOptions {
    return GraphOptions {
        max_file_size: config.max_file_size,
        resolve_external_commands: config.resolve_external_commands,
        tokenizer: config.tokenizer,
    };
}

/// Graph `units` and rewrite every location relative to `root`.
///
/// # Errors
///
/// Returns `Error::NoSourceUnits` for empty input, or the first graphing or
/// path normalization failure.
pub fn graph_units(
    root: &Path,
    config: &Config,
    table: &CommandTable,
    units: &[SourceUnit],
) -> Result<GraphOutput, Error> {
    if units.is_empty() {
        tracing::warn!("input contains no source unit data");
        return Err(Error::NoSourceUnits);
    }

    let mut builder = GraphBuilder::new(table, graph_options(config));
    builder.graph_units(units)?;
    let mut output = builder.finish();

    let mut normalizer = PathNormalizer::new(root);
    graph::relativize(&mut output, &mut normalizer)?;

    tracing::info!(
        units = units.len(),
        defs = output.defs.len(),
        refs = output.refs.len(),
        "graph complete"
    );
    return Ok(output);
}

/// Read all of stdin. The handle is released when this returns.
///
/// # Errors
///
/// Returns `Error::Io` if reading fails.
fn read_stdin() -> Result<Vec<u8>, Error> {
    let mut input = Vec::new();
    std::io::stdin().lock().read_to_end(&mut input)?;
    return Ok(input);
}

/// A unit with at least one file depends on the man pages; an empty one
/// depends on nothing.
pub fn resolve_dependencies(unit: &SourceUnit) -> Vec<Resolution> {
    if unit.info.files.is_empty() {
        tracing::warn!(unit = %unit.key.name, "source unit has no files");
        return Vec::new();
    }
    return vec![Resolution {
        target: MAN_PAGES.into(),
    }];
}

/// Scan the symlink-resolved `root` and write the discovered unit.
///
/// # Errors
///
/// Returns errors from the directory walk or writing stdout.
pub fn scan(root: &Path, config: &Config) -> Result<(), Error> {
    let scan_dir = resolve_symlinks(root);
    let units = scanner::scan(&scan_dir, config)?;
    return write_pretty(&units);
}

/// Write `value` to stdout as two-space indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns `Error::Json` or `Error::Io` if encoding or writing fails.
fn write_pretty<T: serde::Serialize>(value: &T) -> Result<(), Error> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    return Ok(());
}
