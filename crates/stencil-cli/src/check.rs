//! File discovery and analysis for `stencil check`.

use anyhow::Context;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use stencil_analysis::{Analyzer, Diagnostic, DocumentId};
use tracing::debug;

/// Extensions picked up when a directory is given.
pub const TEMPLATE_PATTERNS: &[&str] = &["**/*.edge", "**/*.stencil"];

/// Diagnostics for one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Expands files, directories, and glob patterns into a sorted set of files.
pub fn collect_files(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.insert(path.to_path_buf());
        } else if path.is_dir() {
            for pattern in TEMPLATE_PATTERNS {
                glob_into(&format!("{}/{}", path.display(), pattern), &mut files)?;
            }
        } else {
            let before = files.len();
            glob_into(input, &mut files)?;
            if files.len() == before {
                anyhow::bail!("no templates match '{input}'");
            }
        }
    }
    debug!(files = files.len(), "collected templates");
    Ok(files.into_iter().collect())
}

fn glob_into(pattern: &str, files: &mut BTreeSet<PathBuf>) -> anyhow::Result<()> {
    for entry in
        glob::glob(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?
    {
        let path = entry?;
        if path.is_file() {
            files.insert(path);
        }
    }
    Ok(())
}

/// Analyzes each file once.
pub fn check_files(analyzer: &mut Analyzer, files: &[PathBuf]) -> anyhow::Result<Vec<FileReport>> {
    files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read template '{}'", path.display()))?;
            let id = DocumentId::from(path.display().to_string());
            let diagnostics = analyzer.analyze(&id, 1, &text);
            // Files are never revisited.
            analyzer.invalidate(&id);
            Ok(FileReport {
                path: path.clone(),
                diagnostics,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use stencil_analysis::{CacheConfig, GrammarLoader};

    fn temp_dir(prefix: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("{prefix}-{stamp}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_collects_templates_from_directory() {
        let root = temp_dir("stencil-cli-collect");
        std::fs::create_dir_all(root.join("partials")).expect("create dir");
        std::fs::write(root.join("home.edge"), "@if(a)\n@end").expect("write");
        std::fs::write(root.join("partials/nav.edge"), "{{ }}").expect("write");
        std::fs::write(root.join("notes.txt"), "@end").expect("write");

        let files = collect_files(&[root.display().to_string()]).expect("collect");
        assert_eq!(
            files,
            vec![root.join("home.edge"), root.join("partials/nav.edge")]
        );

        let grammar = GrammarLoader::default().initialize().expect("grammar");
        let mut analyzer = Analyzer::new(grammar, CacheConfig::default());
        let reports = check_files(&mut analyzer, &files).expect("check");
        assert!(!reports[0].has_errors());
        assert_eq!(reports[1].diagnostics.len(), 1);
        assert!(!reports[1].has_errors());
        assert!(analyzer.cache().is_empty());

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_unmatched_pattern_is_an_error() {
        let root = temp_dir("stencil-cli-empty");
        let pattern = format!("{}/*.edge", root.display());
        assert!(collect_files(&[pattern]).is_err());
        std::fs::remove_dir_all(root).ok();
    }
}
