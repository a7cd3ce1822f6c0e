//! Loading of rules documents and unit dumps.

use anyhow::{ensure, Context, Result};
use namecheck_core::syntax::SourceUnit;
use namecheck_core::RawRules;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads and deserializes the rules document.
pub fn rules_from_file(path: &Path) -> Result<RawRules> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read rules file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse rules file {}", path.display()))
}

/// Expands targets into unit dump files.
///
/// Directories are scanned recursively for `*.json` files, sorted so the
/// diagnostic stream is deterministic; plain file targets are kept as
/// given.
pub fn expand_targets(targets: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for target in targets {
        if target.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(target) {
                let entry = entry.with_context(|| format!("scan {}", target.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "json")
                {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(target.clone());
        }
    }
    ensure!(!files.is_empty(), "no unit dump files in targets");
    Ok(files)
}

/// Deserializes one unit dump file: a JSON array of source units.
pub fn units_from_file(path: &Path) -> Result<Vec<SourceUnit>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read unit dump {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse unit dump {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use namecheck_core::RuleSet;
    use std::fs;

    #[test]
    fn loads_and_compiles_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"^int$": {"param": {"^n$": "n"}}}"#).unwrap();

        let raw = rules_from_file(&path).unwrap();
        let rules = RuleSet::compile(&raw).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn rejects_unreadable_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = rules_from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("read rules file"));
    }

    #[test]
    fn rejects_unparseable_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, "not json").unwrap();

        let err = rules_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("parse rules file"));
    }

    #[test]
    fn expands_directories_to_sorted_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = expand_targets(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn empty_expansion_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_targets(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().contains("no unit dump files"));
    }

    #[test]
    fn loads_unit_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.json");
        fs::write(&path, r#"[{"id": "p", "path": "p"}]"#).unwrap();

        let units = units_from_file(&path).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "p");
    }
}
