//! Utilities for input path collection and formatting.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Result, error::PdfMixError};

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// A pattern without glob metacharacters is taken literally even if the path
/// does not exist, so that loading it reports a proper "file not found".
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();
    if !is_glob_pattern(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| PdfMixError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfMixError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Replace every directory in `paths` with the PDF files directly inside it.
///
/// Files are kept as given. Directory contents are matched on a `.pdf`
/// extension in any case, are not searched recursively, and are sorted by
/// file name.
pub fn expand_directories(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::with_capacity(paths.len());

    for path in paths {
        if path.is_dir() {
            expanded.extend(pdf_files_in(path)?);
        } else {
            expanded.push(path.clone());
        }
    }

    Ok(expanded)
}

/// Resolve command-line inputs: expand globs, then directories.
pub fn collect_pdf_inputs<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let paths = collect_paths_for_patterns(patterns)?;
    expand_directories(&paths)
}

fn pdf_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| PdfMixError::Other {
            message: format!("Failed to read directory {}: {err}", dir.display()),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), &["pdf"]) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Check a path's extension against a list, ignoring case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// File stem as an owned string, `"output"` when the path has none.
pub fn file_stem_or_default(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    #[test]
    fn test_directory_expansion_sorted_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.pdf");
        touch(temp_dir.path(), "A.PDF");
        touch(temp_dir.path(), "notes.txt");
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        touch(&temp_dir.path().join("nested"), "c.pdf");

        let expanded = expand_directories(&[temp_dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = expanded
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn test_files_are_kept_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let z = touch(temp_dir.path(), "z.pdf");
        let a = touch(temp_dir.path(), "a.pdf");

        let expanded = expand_directories(&[z.clone(), a.clone()]).unwrap();
        assert_eq!(expanded, vec![z, a]);
    }

    #[test]
    fn test_glob_patterns() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "one.pdf");
        touch(temp_dir.path(), "two.pdf");
        touch(temp_dir.path(), "skip.txt");

        let pattern = format!("{}/*.pdf", temp_dir.path().display());
        let paths = collect_paths_for_patterns([pattern]).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_literal_missing_path_is_kept() {
        let paths = collect_paths_for_patterns(["/definitely/missing.pdf"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/definitely/missing.pdf")]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(collect_paths_for_patterns(["[unclosed"]).is_err());
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.DOCX"), &["doc", "docx"]));
        assert!(!has_extension(Path::new("a.pdf"), &["doc"]));
        assert!(!has_extension(Path::new("noext"), &["pdf"]));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
