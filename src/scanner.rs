use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::types::{BASH_UNIT_TYPE, SourceUnit, UnitInfo, UnitKey};

/// Walk the tree rooted at `root` and collect every regular file with a
/// script extension into a single `BashDirectory` unit named after `root`.
/// Files are listed in lexical walk order. Symlinks are not followed.
///
/// # Errors
///
/// Returns `Error::Walk` if any directory entry cannot be read.
pub fn scan(root: &Path, config: &Config) -> Result<Vec<SourceUnit>, Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !config.is_script(entry.path()) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !config.should_scan(&relative.to_string_lossy()) {
            tracing::debug!(path = %relative.display(), "excluded by config");
            continue;
        }
        files.push(entry.into_path());
    }

    tracing::info!(root = %root.display(), files = files.len(), "scanned for shell scripts");
    if files.is_empty() {
        tracing::warn!(root = %root.display(), "no shell scripts found");
    }

    return Ok(vec![SourceUnit {
        info: UnitInfo {
            dir: root.to_path_buf(),
            files,
        },
        key: UnitKey {
            name: root.to_string_lossy().into_owned(),
            unit_type: BASH_UNIT_TYPE.to_string(),
        },
    }]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "echo hi\n").unwrap();
    }

    #[test]
    fn collects_only_scripts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.sh");
        touch(dir.path(), "b.sh");
        touch(dir.path(), "notes.txt");

        let units = scan(dir.path(), &Config::default()).unwrap();
        assert_eq!(units.len(), 1);
        let unit = &units[0];
        assert_eq!(unit.key.unit_type, "BashDirectory");
        assert_eq!(unit.info.dir, dir.path());
        assert_eq!(unit.info.files, vec![dir.path().join("a.sh"), dir.path().join("b.sh")]);
    }

    #[test]
    fn walks_subdirectories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "z.sh");
        touch(dir.path(), "lib/util.sh");

        let units = scan(dir.path(), &Config::default()).unwrap();
        assert_eq!(units[0].info.files, vec![dir.path().join("lib/util.sh"), dir.path().join("z.sh")]);
    }

    #[test]
    fn config_filters_apply_to_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "bin/run.sh");
        touch(dir.path(), "vendor/dep.sh");
        touch(dir.path(), "bin/run.bash");

        let config = Config::parse("extensions = [\"sh\", \"bash\"]\nexclude = [\"vendor/\"]").unwrap();
        let units = scan(dir.path(), &config).unwrap();
        assert_eq!(
            units[0].info.files,
            vec![dir.path().join("bin/run.bash"), dir.path().join("bin/run.sh")]
        );
    }

    #[test]
    fn empty_directory_yields_one_empty_unit() {
        let dir = tempfile::tempdir().unwrap();
        let units = scan(dir.path(), &Config::default()).unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].info.files.is_empty());
    }
}
