/// Wire types exchanged with the code-intelligence host.
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Source unit type emitted by `scan` and stamped on every def and ref.
pub const BASH_UNIT_TYPE: &str = "BashDirectory";

/// Keyword recorded in def metadata.
pub const FUNCTION_KEYWORD: &str = "function";

/// Kind recorded on every def.
pub const FUNCTION_KIND: &str = "function";

/// The external documentation corpus that command references point into.
#[derive(Debug, Clone, Copy)]
pub struct DocCorpus {
    /// Clone URL of the repository holding the pages.
    pub repo: &'static str,
    /// Unit name inside that repository.
    pub unit: &'static str,
    /// Unit type inside that repository.
    pub unit_type: &'static str,
}

/// POSIX man pages, the only dependency any shell unit ever has.
pub const MAN_PAGES: DocCorpus = DocCorpus {
    repo: "github.com/sourcegraph/man-pages-posix",
    unit: "man",
    unit_type: "ManPages",
};

/// A function definition. Byte range covers the function name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Def {
    /// Definition metadata for hover rendering.
    pub data: DefData,
    /// Byte offset one past the last byte of the name.
    pub def_end: u32,
    /// Byte offset of the first byte of the name.
    pub def_start: u32,
    /// Always true: shell functions are visible to anything that sources the file.
    pub exported: bool,
    /// File declaring the function.
    pub file: String,
    /// Always `function`.
    pub kind: String,
    /// The function name.
    pub name: String,
    /// Unique key, `<file>/<name>`.
    pub path: String,
    /// Name of the owning source unit.
    pub unit: String,
    /// Type of the owning source unit.
    pub unit_type: String,
}

/// Metadata attached to a def, rendered by the host as `function <name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefData {
    /// Always `function`.
    pub keyword: String,
    /// Always `function`.
    pub kind: String,
    /// The function name.
    pub name: String,
    /// Separator between keyword and name.
    pub separator: String,
    /// Type text; shell functions are untyped so this is a single space.
    #[serde(rename = "Type")]
    pub type_text: String,
}

impl DefData {
    /// Metadata for a function named `name`.
    pub fn function(name: &str) -> Self {
        return Self {
            keyword: FUNCTION_KEYWORD.to_string(),
            kind: FUNCTION_KIND.to_string(),
            name: name.to_string(),
            separator: " ".to_string(),
            type_text: " ".to_string(),
        };
    }
}

/// Accumulated defs, refs, and docs for every file of every unit, in
/// processing order.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GraphOutput {
    /// Function definitions.
    pub defs: Vec<Def>,
    /// Documentation entries. Shell scripts carry none.
    pub docs: Vec<serde_json::Value>,
    /// Identifier use sites, including definition sites.
    pub refs: Vec<Ref>,
}

/// An identifier occurrence pointing at a local def path or an external page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ref {
    /// True when this occurrence is the name in a function definition.
    pub def: bool,
    /// Target path: `<file>/<name>` locally, `<page>/<command>` externally.
    pub def_path: String,
    /// Repository of the target; absent for same-repository targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def_repo: Option<String>,
    /// Unit of the target.
    pub def_unit: String,
    /// Unit type of the target.
    pub def_unit_type: String,
    /// Byte offset one past the identifier.
    pub end: u32,
    /// File containing the occurrence.
    pub file: String,
    /// Byte offset of the identifier.
    pub start: u32,
    /// Unit containing the occurrence.
    pub unit: String,
    /// Type of the unit containing the occurrence.
    pub unit_type: String,
}

/// One dependency resolution entry emitted by `depresolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resolution {
    /// The resolved dependency.
    pub target: ResolvedTarget,
}

/// Where a resolved dependency lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// Repository clone URL.
    #[serde(rename = "ToRepoCloneURL")]
    pub to_repo_clone_url: String,
    /// Unit name inside the repository.
    #[serde(rename = "ToUnit")]
    pub to_unit: String,
    /// Unit type inside the repository.
    #[serde(rename = "ToUnitType")]
    pub to_unit_type: String,
}

impl From<DocCorpus> for ResolvedTarget {
    fn from(corpus: DocCorpus) -> Self {
        return Self {
            to_repo_clone_url: corpus.repo.to_string(),
            to_unit: corpus.unit.to_string(),
            to_unit_type: corpus.unit_type.to_string(),
        };
    }
}

/// A named collection of scripts analysed together. Key and info fields
/// are flattened on the wire; unknown host fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Where the files live.
    #[serde(flatten)]
    pub info: UnitInfo,
    /// Identity of the unit.
    #[serde(flatten)]
    pub key: UnitKey,
}

/// File-level contents of a source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitInfo {
    /// Root directory of the unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dir: PathBuf,
    /// Scripts belonging to the unit, in processing order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<PathBuf>,
}

/// Identity of a source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitKey {
    /// Unit name; `scan` uses the absolute directory path.
    #[serde(default)]
    pub name: String,
    /// Unit type, normally `BashDirectory`.
    #[serde(default, rename = "Type")]
    pub unit_type: String,
}

/// Decode an explicit JSON `null` as the type's default. Hosts written in
/// Go send `"Files": null` for a unit with no scripts.
///
/// # Errors
///
/// Returns the deserializer's error for any other mismatched value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    return Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unit_is_flat_on_the_wire() {
        let unit = SourceUnit {
            info: UnitInfo {
                dir: PathBuf::from("/src"),
                files: vec![PathBuf::from("/src/a.sh")],
            },
            key: UnitKey {
                name: "/src".to_string(),
                unit_type: BASH_UNIT_TYPE.to_string(),
            },
        };
        let value = serde_json::to_value(&unit).unwrap();
        assert_eq!(value["Name"], "/src");
        assert_eq!(value["Type"], "BashDirectory");
        assert_eq!(value["Dir"], "/src");
        assert_eq!(value["Files"][0], "/src/a.sh");
    }

    #[test]
    fn source_unit_ignores_unknown_host_fields() {
        let json = r#"{"Name":"u","Type":"BashDirectory","Repo":"r","CommitID":"c","Files":["/x.sh"],"Ops":{"graph":null}}"#;
        let unit: SourceUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.key.name, "u");
        assert_eq!(unit.info.files, vec![PathBuf::from("/x.sh")]);
    }

    #[test]
    fn null_files_and_dir_decode_as_empty() {
        let unit: SourceUnit = serde_json::from_str(r#"{"Name":"a","Type":"BashDirectory","Dir":null,"Files":null}"#).unwrap();
        assert!(unit.info.files.is_empty());
        assert_eq!(unit.info.dir, PathBuf::new());
    }

    #[test]
    fn local_ref_omits_def_repo() {
        let reference = Ref {
            def: false,
            def_path: "a.sh/f".to_string(),
            def_repo: None,
            def_unit: "u".to_string(),
            def_unit_type: BASH_UNIT_TYPE.to_string(),
            end: 3,
            file: "a.sh".to_string(),
            start: 2,
            unit: "u".to_string(),
            unit_type: BASH_UNIT_TYPE.to_string(),
        };
        let value = serde_json::to_value(&reference).unwrap();
        assert!(value.get("DefRepo").is_none());
        assert_eq!(value["DefPath"], "a.sh/f");
    }

    #[test]
    fn def_data_uses_function_keyword() {
        let value = serde_json::to_value(DefData::function("greet")).unwrap();
        assert_eq!(value["Keyword"], "function");
        assert_eq!(value["Type"], " ");
        assert_eq!(value["Name"], "greet");
    }
}
