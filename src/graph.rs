//! Definition and reference extraction for shell scripts.
//!
//! Each file is scanned once, front to back. An identifier directly after
//! the `function` keyword is a definition. Every identifier, the keyword
//! included, gets a reference, either to a POSIX command page or to
//! `<file>/<name>`.

use std::io::Read as _;
use std::path::Path;

use crate::command_table::CommandTable;
use crate::error::Error;
use crate::paths::PathNormalizer;
use crate::tokenizer::{self, Token, TokenKind, TokenizerKind};
use crate::types::{
    BASH_UNIT_TYPE, Def, DefData, FUNCTION_KEYWORD, FUNCTION_KIND, GraphOutput, MAN_PAGES, Ref, SourceUnit,
};

/// Accumulates defs and refs for every file it is handed, in order.
pub struct GraphBuilder<'t> {
    /// External command pages, shared read-only across files.
    commands: &'t CommandTable,
    /// Behaviour switches.
    options: GraphOptions,
    /// Everything emitted so far.
    output: GraphOutput,
}

/// Behaviour switches for the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Scripts larger than this many bytes are rejected.
    pub max_file_size: u64,
    /// Look identifiers up in the command table. Off reproduces the
    /// plain-reference behaviour where every use points at `<file>/<name>`.
    pub resolve_external_commands: bool,
    /// Token backend.
    pub tokenizer: TokenizerKind,
}

/// Position of an identifier occurrence within one file.
struct Occurrence<'s> {
    /// Byte offset one past the name.
    end: u32,
    /// File key the occurrence is recorded under.
    file: &'s str,
    /// The identifier.
    name: &'s str,
    /// Byte offset of the name.
    start: u32,
    /// Owning unit name.
    unit: &'s str,
}

/// Where the scan is relative to the `function` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// The previous identifier was `function`; the next one is a definition.
    AfterFunctionKeyword,
    /// Any other identifier has been seen.
    Normal,
    /// No identifier seen yet in this file.
    Start,
}

impl<'t> GraphBuilder<'t> {
    /// Consume the builder, returning everything accumulated.
    pub fn finish(self) -> GraphOutput {
        return self.output;
    }

    /// Open, read, and graph one script.
    ///
    /// # Errors
    ///
    /// Returns `Error::OpenFailed` or `Error::ReadFailed` on I/O failure, and
    /// anything `graph_source` returns.
    #[allow(clippy::verbose_file_reads, reason = "open and read failures are reported separately")]
    pub fn graph_file(&mut self, unit: &str, path: &Path) -> Result<(), Error> {
        let mut file = std::fs::File::open(path).map_err(|source| {
            return Error::OpenFailed {
                path: path.to_path_buf(),
                source,
            };
        })?;
        let mut source = Vec::new();
        file.read_to_end(&mut source).map_err(|err| {
            return Error::ReadFailed {
                path: path.to_path_buf(),
                source: err,
            };
        })?;
        return self.graph_source(unit, path, &source);
    }

    /// Graph already-loaded script bytes, recording locations under `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileTooLarge` if the source exceeds the size limit or
    /// 32-bit offsets, or `Error::ParseFailed` from the tree-sitter backend.
    pub fn graph_source(&mut self, unit: &str, path: &Path, source: &[u8]) -> Result<(), Error> {
        let size_bytes: u64 = source.len().try_into().unwrap_or(u64::MAX);
        let max_bytes = self.options.max_file_size.min(u64::from(u32::MAX));
        if size_bytes > max_bytes {
            return Err(Error::FileTooLarge {
                file: path.to_path_buf(),
                max_bytes,
                size_bytes,
            });
        }

        let file = path.to_string_lossy();
        let defs_before = self.output.defs.len();
        let refs_before = self.output.refs.len();
        let mut state = ScanState::Start;

        for token in tokenizer::tokens(self.options.tokenizer, path, source)? {
            if token.kind != TokenKind::Identifier {
                continue;
            }
            let Some(occurrence) = locate(&token, &file, unit) else {
                continue;
            };
            if token.text == FUNCTION_KEYWORD {
                let def_path = format!("{file}/{FUNCTION_KEYWORD}");
                self.output.refs.push(local_ref(&occurrence, def_path, false));
                state = ScanState::AfterFunctionKeyword;
                continue;
            }
            if state == ScanState::AfterFunctionKeyword {
                self.push_definition(&occurrence);
            } else {
                self.push_use(&occurrence);
            }
            state = ScanState::Normal;
        }

        tracing::debug!(
            file = %file,
            defs = self.output.defs.len().saturating_sub(defs_before),
            refs = self.output.refs.len().saturating_sub(refs_before),
            "graphed script"
        );
        return Ok(());
    }

    /// Graph every file of every unit, stopping at the first failure.
    /// Results from files that completed before the failure stay in the
    /// accumulator.
    ///
    /// # Errors
    ///
    /// Returns the first error from `graph_file`.
    pub fn graph_units(&mut self, units: &[SourceUnit]) -> Result<(), Error> {
        for unit in units {
            if unit.info.files.is_empty() {
                tracing::warn!(unit = %unit.key.name, "source unit has no files");
            }
            for path in &unit.info.files {
                self.graph_file(&unit.key.name, path)?;
            }
        }
        return Ok(());
    }

    /// Create a builder with an empty accumulator.
    pub fn new(commands: &'t CommandTable, options: GraphOptions) -> Self {
        return Self {
            commands,
            options,
            output: GraphOutput::default(),
        };
    }

    /// Emit a def and its definition-site ref.
    fn push_definition(&mut self, at: &Occurrence<'_>) {
        let path = format!("{}/{}", at.file, at.name);
        self.output.defs.push(Def {
            data: DefData::function(at.name),
            def_end: at.end,
            def_start: at.start,
            exported: true,
            file: at.file.to_string(),
            kind: FUNCTION_KIND.to_string(),
            name: at.name.to_string(),
            path: path.clone(),
            unit: at.unit.to_string(),
            unit_type: BASH_UNIT_TYPE.to_string(),
        });
        self.output.refs.push(local_ref(at, path, true));
    }

    /// Emit a ref for a use site: a command page if the table knows the
    /// name, otherwise `<file>/<name>` in the same unit.
    fn push_use(&mut self, at: &Occurrence<'_>) {
        let page = if self.options.resolve_external_commands { self.commands.page_for(at.name) } else { None };
        let reference = match page {
            Some(page) => Ref {
                def: false,
                def_path: format!("{page}/{}", at.name),
                def_repo: Some(MAN_PAGES.repo.to_string()),
                def_unit: MAN_PAGES.unit.to_string(),
                def_unit_type: MAN_PAGES.unit_type.to_string(),
                end: at.end,
                file: at.file.to_string(),
                start: at.start,
                unit: at.unit.to_string(),
                unit_type: BASH_UNIT_TYPE.to_string(),
            },
            None => local_ref(at, format!("{}/{}", at.file, at.name), false),
        };
        self.output.refs.push(reference);
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        return Self {
            max_file_size: 16 * 1024 * 1024,
            resolve_external_commands: true,
            tokenizer: TokenizerKind::Words,
        };
    }
}

/// A ref to `def_path` inside the occurrence's own unit.
fn local_ref(at: &Occurrence<'_>, def_path: String, is_definition: bool) -> Ref {
    return Ref {
        def: is_definition,
        def_path,
        def_repo: None,
        def_unit: at.unit.to_string(),
        def_unit_type: BASH_UNIT_TYPE.to_string(),
        end: at.end,
        file: at.file.to_string(),
        start: at.start,
        unit: at.unit.to_string(),
        unit_type: BASH_UNIT_TYPE.to_string(),
    };
}

/// Compute the byte range of an identifier token.
fn locate<'s>(token: &'s Token<'_>, file: &'s str, unit: &'s str) -> Option<Occurrence<'s>> {
    let start = token.end.checked_sub(token.text.len())?;
    return Some(Occurrence {
        end: u32::try_from(token.end).ok()?,
        file,
        name: &token.text,
        start: u32::try_from(start).ok()?,
        unit,
    });
}

/// Replace a leading `<old_file>/` in `key` with `<new_file>/`.
fn rebase_key(key: &str, old_file: &str, new_file: &str) -> String {
    return match key.strip_prefix(old_file).and_then(|rest| return rest.strip_prefix('/')) {
        Some(rest) => format!("{new_file}/{rest}"),
        None => key.to_string(),
    };
}

/// Rewrite every file field, and every key derived from one, relative to
/// the normalizer's base directory.
///
/// # Errors
///
/// Returns `Error::RelativePath` if any file has no relative form.
pub fn relativize(output: &mut GraphOutput, normalizer: &mut PathNormalizer) -> Result<(), Error> {
    for def in &mut output.defs {
        let relative = normalizer.relative(&def.file)?;
        def.path = rebase_key(&def.path, &def.file, &relative);
        def.file = relative;
    }
    for reference in &mut output.refs {
        let relative = normalizer.relative(&reference.file)?;
        if reference.def_repo.is_none() {
            reference.def_path = rebase_key(&reference.def_path, &reference.file, &relative);
        }
        reference.file = relative;
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(options: GraphOptions, file: &str, src: &str) -> GraphOutput {
        let table = CommandTable::posix();
        let mut builder = GraphBuilder::new(&table, options);
        builder.graph_source("unit", Path::new(file), src.as_bytes()).unwrap();
        return builder.finish();
    }

    fn graph(file: &str, src: &str) -> GraphOutput {
        return graph_with(GraphOptions::default(), file, src);
    }

    fn text_at<'s>(src: &'s str, start: u32, end: u32) -> &'s str {
        return &src[start as usize..end as usize];
    }

    #[test]
    fn greet_scenario() {
        let src = "function greet(){ echo hi; }\ngreet\n";
        let out = graph("greet.sh", src);

        assert_eq!(out.defs.len(), 1);
        let def = &out.defs[0];
        assert_eq!(def.name, "greet");
        assert_eq!(def.path, "greet.sh/greet");
        assert_eq!(def.kind, "function");
        assert!(def.exported);
        assert_eq!(text_at(src, def.def_start, def.def_end), "greet");

        let to_greet: Vec<&Ref> = out.refs.iter().filter(|r| r.def_path == "greet.sh/greet").collect();
        assert_eq!(to_greet.len(), 2);
        assert_eq!(to_greet.iter().filter(|r| r.def).count(), 1);
        assert_eq!(to_greet.iter().filter(|r| !r.def).count(), 1);

        let echo = out.refs.iter().find(|r| text_at(src, r.start, r.end) == "echo").unwrap();
        assert_eq!(echo.def_path, "man1p/echo");
        assert_eq!(echo.def_repo.as_deref(), Some("github.com/sourcegraph/man-pages-posix"));
        assert_eq!(echo.def_unit_type, "ManPages");
        assert_eq!(echo.def_unit, "man");
    }

    #[test]
    fn every_def_has_matching_definition_site_ref() {
        let src = "function a { :; }\nfunction b() {\n  a\n}\nfunction   c\n{ b; }\n";
        let out = graph("x.sh", src);
        assert_eq!(out.defs.len(), 3);
        for def in &out.defs {
            let site: Vec<&Ref> = out
                .refs
                .iter()
                .filter(|r| r.def && r.file == def.file && r.start == def.def_start && r.end == def.def_end)
                .collect();
            assert_eq!(site.len(), 1, "def {} needs exactly one site ref", def.name);
            assert_eq!(site[0].def_path, def.path);
        }
    }

    #[test]
    fn offsets_match_identifier_length() {
        let src = "#!/bin/sh\nfunction deploy { rsync -a \"$SRC\" host:; ls; }\ndeploy --now\n";
        let out = graph("d.sh", src);
        assert!(!out.refs.is_empty());
        for r in &out.refs {
            let text = text_at(src, r.start, r.end);
            assert!(r.start < r.end);
            assert!(tokenizer::is_identifier(text), "{text:?} is not an identifier");
            assert!(r.def_path.ends_with(text));
        }
        for d in &out.defs {
            assert_eq!((d.def_end - d.def_start) as usize, d.name.len());
        }
    }

    #[test]
    fn definition_takes_priority_over_command_table() {
        let src = "function ls() { :; }";
        let out = graph("l.sh", src);
        assert_eq!(out.defs.len(), 1);
        assert_eq!(out.defs[0].name, "ls");
        assert_eq!(out.refs.len(), 2);
        assert!(out.refs[1].def);
        assert_eq!(out.refs[1].def_path, "l.sh/ls");
        assert!(out.refs[1].def_repo.is_none());
    }

    #[test]
    fn repeated_keyword_defines_following_name() {
        let out = graph("f.sh", "function function foo");
        assert_eq!(out.defs.len(), 1);
        assert_eq!(out.defs[0].name, "foo");
        assert_eq!(out.refs.len(), 3);
        assert_eq!(out.refs.iter().filter(|r| r.def_path == "f.sh/function").count(), 2);
        assert!(out.refs.iter().filter(|r| r.def_path == "f.sh/function").all(|r| !r.def));
    }

    #[test]
    fn keyword_is_a_plain_local_reference() {
        let out = graph("f.sh", "function foo");
        let spans: Vec<(&str, u32, u32, bool)> =
            out.refs.iter().map(|r| (r.def_path.as_str(), r.start, r.end, r.def)).collect();
        assert_eq!(spans, vec![("f.sh/function", 0, 8, false), ("f.sh/foo", 9, 12, true)]);
        assert!(out.refs[0].def_repo.is_none());
        assert_eq!(out.defs.len(), 1);
    }

    #[test]
    fn operators_between_keyword_and_name_keep_context() {
        let out = graph("f.sh", "function\n  setup ( ) { :; }");
        assert_eq!(out.defs.len(), 1);
        assert_eq!(out.defs[0].name, "setup");
    }

    #[test]
    fn non_table_names_are_never_external() {
        let out = graph("n.sh", "Echo LS greet_user _x");
        assert_eq!(out.refs.len(), 4);
        assert!(out.refs.iter().all(|r| r.def_repo.is_none() && r.def_path.starts_with("n.sh/")));
    }

    #[test]
    fn plain_mode_skips_command_table() {
        let options = GraphOptions {
            resolve_external_commands: false,
            ..GraphOptions::default()
        };
        let out = graph_with(options, "p.sh", "echo hi\nfunction f { ls; }");
        assert_eq!(out.defs.len(), 1);
        assert!(out.refs.iter().all(|r| r.def_repo.is_none()));
        assert!(out.refs.iter().any(|r| r.def_path == "p.sh/echo"));
    }

    #[test]
    fn tree_sitter_backend_agrees_on_simple_scripts() {
        let src = "function greet() {\n  echo hi\n}\ngreet\n";
        let options = GraphOptions {
            tokenizer: TokenizerKind::TreeSitter,
            ..GraphOptions::default()
        };
        assert_eq!(graph_with(options, "g.sh", src), graph("g.sh", src));
    }

    #[test]
    fn empty_file_yields_nothing() {
        let out = graph("empty.sh", "");
        assert!(out.defs.is_empty());
        assert!(out.refs.is_empty());
    }

    #[test]
    fn graphing_is_deterministic() {
        let src = "function a { b; }\nfunction b { a; cat; }\n";
        let first = serde_json::to_string(&graph("a.sh", src)).unwrap();
        let second = serde_json::to_string(&graph("a.sh", src)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_source_is_rejected() {
        let table = CommandTable::posix();
        let options = GraphOptions {
            max_file_size: 4,
            ..GraphOptions::default()
        };
        let mut builder = GraphBuilder::new(&table, options);
        let err = builder.graph_source("u", Path::new("big.sh"), b"echo hello").unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { size_bytes: 10, .. }));
    }

    #[test]
    fn missing_file_aborts_remaining_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.sh");
        std::fs::write(&good, "function ok { :; }\n").unwrap();
        let never = dir.path().join("never.sh");
        std::fs::write(&never, "function never { :; }\n").unwrap();

        let unit = SourceUnit {
            info: crate::types::UnitInfo {
                dir: dir.path().to_path_buf(),
                files: vec![good, dir.path().join("missing.sh"), never],
            },
            key: crate::types::UnitKey {
                name: "u".to_string(),
                unit_type: BASH_UNIT_TYPE.to_string(),
            },
        };
        let table = CommandTable::posix();
        let mut builder = GraphBuilder::new(&table, GraphOptions::default());
        let err = builder.graph_units(&[unit]).unwrap_err();
        assert!(matches!(err, Error::OpenFailed { .. }));

        let out = builder.finish();
        let names: Vec<&str> = out.defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn relativize_rewrites_files_and_local_keys() {
        let src = "function greet { echo hi; }\ngreet\n";
        let mut out = graph("/repo/bin/greet.sh", src);
        let mut normalizer = PathNormalizer::new(Path::new("/repo"));
        relativize(&mut out, &mut normalizer).unwrap();

        assert_eq!(out.defs[0].file, "bin/greet.sh");
        assert_eq!(out.defs[0].path, "bin/greet.sh/greet");
        assert!(out.refs.iter().all(|r| r.file == "bin/greet.sh"));
        let echo = out.refs.iter().find(|r| r.def_repo.is_some()).unwrap();
        assert_eq!(echo.def_path, "man1p/echo");
        assert!(out.refs.iter().any(|r| r.def_path == "bin/greet.sh/hi"));
    }

    #[test]
    fn rebase_only_touches_matching_prefix() {
        assert_eq!(rebase_key("/a/x.sh/f", "/a/x.sh", "x.sh"), "x.sh/f");
        assert_eq!(rebase_key("/a/x.shell/f", "/a/x.sh", "x.sh"), "/a/x.shell/f");
        assert_eq!(rebase_key("man1p/ls", "/a/x.sh", "x.sh"), "man1p/ls");
    }
}
