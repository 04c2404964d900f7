use std::path::Path;

use crate::error::Error;
use crate::tokenizer::TokenizerKind;

/// Default cap on a script's size (16 MiB).
const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Name of the optional project config file.
pub const CONFIG_FILE: &str = ".shxref.toml";

/// Project configuration loaded from `.shxref.toml`.
/// Include/exclude patterns are path prefixes applied to scanned scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path prefixes dropped after `include` is applied.
    exclude: Vec<String>,
    /// File extensions (without the dot) that `scan` collects.
    pub extensions: Vec<String>,
    /// Path prefixes to keep; empty keeps everything.
    include: Vec<String>,
    /// Scripts larger than this many bytes are rejected.
    pub max_file_size: u64,
    /// Whether identifiers are looked up in the command table.
    pub resolve_external_commands: bool,
    /// Token backend.
    pub tokenizer: TokenizerKind,
}

/// Raw TOML structure for `.shxref.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ShxrefTomlConfig {
    /// See `Config::exclude`.
    #[serde(default)]
    exclude: Vec<String>,
    /// See `Config::extensions`.
    extensions: Option<Vec<String>>,
    /// See `Config::include`.
    #[serde(default)]
    include: Vec<String>,
    /// See `Config::max_file_size`.
    max_file_size: Option<u64>,
    /// See `Config::resolve_external_commands`.
    resolve_external_commands: Option<bool>,
    /// See `Config::tokenizer`.
    tokenizer: Option<TokenizerKind>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            extensions: vec!["sh".to_string()],
            include: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            resolve_external_commands: true,
            tokenizer: TokenizerKind::Words,
        };
    }
}

impl Config {
    /// Whether `path` has one of the configured script extensions.
    pub fn is_script(&self, path: &Path) -> bool {
        return path
            .extension()
            .and_then(|e| return e.to_str())
            .is_some_and(|ext| return self.extensions.iter().any(|want| return want.trim_start_matches('.') == ext));
    }

    /// Load config from `.shxref.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. A file that exists but
    /// is malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content, filling unset keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: ShxrefTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        return Ok(Self {
            exclude: raw.exclude,
            extensions: raw.extensions.unwrap_or(defaults.extensions),
            include: raw.include,
            max_file_size: raw.max_file_size.unwrap_or(defaults.max_file_size),
            resolve_external_commands: raw
                .resolve_external_commands
                .unwrap_or(defaults.resolve_external_commands),
            tokenizer: raw.tokenizer.unwrap_or(defaults.tokenizer),
        });
    }

    /// Check whether a script path (relative to the scan root) should be collected.
    ///
    /// A path is included if no include patterns are set, or if it starts
    /// with at least one include pattern. An included path is then excluded
    /// if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
