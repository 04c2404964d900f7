use std::io::IsTerminal as _;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as a titled block and print it to stderr. Headings are
/// bold only when stderr is a terminal; the host captures it otherwise.
pub fn print_error(e: &Error) {
    let styled = std::io::stderr().is_terminal();
    for line in render_error(e).lines() {
        if styled && line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured diagnostic: what happened and, where
/// there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::FileTooLarge { file, size_bytes, max_bytes } => render_file_too_large(file, *size_bytes, *max_bytes),
        Error::InputDecode { reason } => render_input_decode(reason),
        Error::Io(err) => render_titled("I/O", err),
        Error::Json(err) => render_titled("JSON Output", err),
        Error::NoSourceUnits => render_no_source_units(),
        Error::OpenFailed { path, source } => render_unreadable_script("Open Failed", path, source),
        Error::ParseFailed { file, reason } => render_parse_failed(file, reason),
        Error::ReadFailed { path, source } => render_unreadable_script("Read Failed", path, source),
        Error::RelativePath { base, path } => render_relative_path(base, path),
        Error::TomlDe(err) => render_invalid_config(err),
        Error::Walk(err) => render_titled("Scan Failed", err),
    }
}

fn render_file_too_large(file: &Path, size_bytes: u64, max_bytes: u64) -> String {
    format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).

## Fix

Raise `max_file_size` in `{CONFIG_FILE}`, or exclude the file from the scan.
", file.display())
}

fn render_input_decode(reason: &str) -> String {
    format!("\
# Error: Invalid Input

Standard input is neither a JSON array of source units nor a single source unit.

{reason}
")
}

fn render_invalid_config(err: &toml::de::Error) -> String {
    format!("\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{err}

## Supported keys

    extensions = [\"sh\"]
    include = []
    exclude = []
    resolve_external_commands = true
    tokenizer = \"words\"        # or \"tree-sitter\"
    max_file_size = 16777216
")
}

fn render_no_source_units() -> String {
    "\
# Error: No Source Units

Input contains no source unit data.

## Fix

Pipe the output of `shxref scan` into `shxref graph`:

    shxref scan | jq '.[0]' | shxref graph
"
    .to_string()
}

fn render_parse_failed(file: &Path, reason: &str) -> String {
    format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}

## Fix

Switch to the word tokenizer:

    tokenizer = \"words\"
", file.display())
}

fn render_relative_path(base: &Path, path: &Path) -> String {
    format!("\
# Error: Path Outside Base

`{}` has no path relative to `{}`.

## Fix

Run `shxref graph` from a directory on the same root as the listed files.
", path.display(), base.display())
}

fn render_titled(title: &str, err: &dyn std::fmt::Display) -> String {
    format!("\
# Error: {title}

{err}
")
}

fn render_unreadable_script(title: &str, path: &Path, source: &std::io::Error) -> String {
    format!("\
# Error: {title}

`{}`: {source}
", path.display())
}
