//! Source file discovery.

use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::scan::is_arma_source;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Sorted, so that extraction order does not depend on the file system.
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

/// Collect the sources under `includes` (relative to `base_dir`).
///
/// Directories are walked for files with an Arma extension. A file named
/// directly is taken whatever its extension.
pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let is_ignored = |path: &Path| {
        literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
            || glob_patterns
                .iter()
                .any(|p| p.matches(&path.to_string_lossy()))
    };

    let mut roots: Vec<PathBuf> = Vec::new();
    for inc in includes {
        if is_glob_pattern(inc) {
            let full_pattern = base_dir.join(inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            inc,
                            e
                        );
                    }
                }
            }
        } else {
            let path = base_dir.join(inc);
            if path.exists() {
                roots.push(path);
            } else if verbose {
                eprintln!(
                    "{} Include path does not exist: {}",
                    "warning:".bold().yellow(),
                    path.display()
                );
            }
        }
    }

    for root in roots {
        if root.is_file() {
            if !is_ignored(&root) {
                files.insert(root);
            }
            continue;
        }
        for entry in WalkDir::new(&root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            if is_ignored(path) {
                continue;
            }
            if entry.file_type().is_file() && is_arma_source(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    tracing::debug!(count = files.len(), "discovered source files");
    ScanResult {
        files,
        skipped_count,
    }
}

/// Name of `path` as written into references: relative to `base_dir` when
/// possible, always with forward slashes.
pub fn logical_path(base_dir: &Path, path: &Path) -> String {
    match path.strip_prefix(base_dir) {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| logical_path(base, f))
            .collect()
    }

    #[test]
    fn test_scan_arma_sources() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("fn_init.sqf")).unwrap();
        File::create(dir_path.join("config.cpp")).unwrap();
        File::create(dir_path.join("stringtable.xml")).unwrap();
        File::create(dir_path.join("readme.md")).unwrap();

        let result = scan_files(dir_path, &[".".to_owned()], &[], false);

        assert_eq!(names(&result, dir_path), vec!["config.cpp", "fn_init.sqf"]);
    }

    #[test]
    fn test_scan_nested_directories_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let functions = dir_path.join("addons").join("main").join("functions");
        fs::create_dir_all(&functions).unwrap();
        File::create(functions.join("fn_b.sqf")).unwrap();
        File::create(functions.join("fn_a.sqf")).unwrap();
        File::create(dir_path.join("addons").join("main").join("config.cpp")).unwrap();

        let result = scan_files(dir_path, &["addons".to_owned()], &[], false);

        assert_eq!(
            names(&result, dir_path),
            vec![
                "addons/main/config.cpp",
                "addons/main/functions/fn_a.sqf",
                "addons/main/functions/fn_b.sqf",
            ]
        );
    }

    #[test]
    fn test_scan_ignores() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let build = dir_path.join("build");
        fs::create_dir(&build).unwrap();
        File::create(build.join("fn_gen.sqf")).unwrap();
        let vendor = dir_path.join("vendor");
        fs::create_dir(&vendor).unwrap();
        File::create(vendor.join("cba.hpp")).unwrap();
        File::create(dir_path.join("fn_main.sqf")).unwrap();

        let result = scan_files(
            dir_path,
            &[".".to_owned()],
            &["**/build/**".to_owned(), "vendor".to_owned()],
            false,
        );

        assert_eq!(names(&result, dir_path), vec!["fn_main.sqf"]);
    }

    #[test]
    fn test_explicit_file_any_extension() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        File::create(dir_path.join("mission.txt")).unwrap();

        let result = scan_files(dir_path, &["mission.txt".to_owned()], &[], false);

        assert_eq!(names(&result, dir_path), vec!["mission.txt"]);
    }

    #[test]
    fn test_overlapping_includes_deduplicate() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        let addons = dir_path.join("addons");
        fs::create_dir(&addons).unwrap();
        File::create(addons.join("fn_a.sqf")).unwrap();

        let result = scan_files(
            dir_path,
            &["addons".to_owned(), "addons/fn_a.sqf".to_owned()],
            &[],
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_glob_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        for addon in ["main", "ui"] {
            let path = dir_path.join("addons").join(addon);
            fs::create_dir_all(&path).unwrap();
            File::create(path.join("config.cpp")).unwrap();
        }
        File::create(dir_path.join("fn_root.sqf")).unwrap();

        let result = scan_files(dir_path, &["addons/*".to_owned()], &[], false);

        assert_eq!(
            names(&result, dir_path),
            vec!["addons/main/config.cpp", "addons/ui/config.cpp"]
        );
    }

    #[test]
    fn test_nonexistent_include_is_skipped() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        File::create(dir_path.join("fn_a.sqf")).unwrap();

        let result = scan_files(
            dir_path,
            &[".".to_owned(), "missing".to_owned()],
            &[],
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_logical_path() {
        let base = Path::new("/work/mission");
        assert_eq!(
            logical_path(base, Path::new("/work/mission/addons/fn_a.sqf")),
            "addons/fn_a.sqf"
        );
        assert_eq!(
            logical_path(base, Path::new("/elsewhere/fn_b.sqf")),
            "/elsewhere/fn_b.sqf"
        );
    }
}
