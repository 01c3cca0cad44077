//! Output naming and atomic file writes.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const FILE_SUFFIX: &str = "_school_transit_map.html";

#[derive(Debug)]
pub struct OutputError {
    pub action: &'static str,
    pub path: PathBuf,
    pub source: io::Error,
}

impl OutputError {
    fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {} '{}': {}", self.action, self.path.display(), self.source)
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Lowercase ASCII alphanumerics; every other run collapses to one `_`.
pub fn city_slug(city: &str) -> String {
    let mut slug = String::with_capacity(city.len());
    let mut pending_sep = false;
    for ch in city.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        "map".to_string()
    } else {
        slug
    }
}

pub fn output_path(out_dir: &Path, city: &str) -> PathBuf {
    out_dir.join(format!("{}{FILE_SUFFIX}", city_slug(city)))
}

/// Write `html` to `path` via a temporary sibling and a rename, creating
/// parent directories as needed. An existing file is replaced.
pub fn write_html(path: &Path, html: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| OutputError::new("create directory", parent, error))?;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("html.tmp.{nanos}"));

    let written = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(html.as_bytes())?;
            file.sync_all()
        })
        .map_err(|error| OutputError::new("write temporary file", &temp_path, error));
    if let Err(error) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(error);
    }

    replace_file(&temp_path, path)
}

fn replace_file(temp_path: &Path, target_path: &Path) -> Result<(), OutputError> {
    match fs::rename(temp_path, target_path) {
        Ok(()) => Ok(()),
        Err(first_error) => {
            if target_path.exists() {
                fs::remove_file(target_path).map_err(|error| {
                    let _ = fs::remove_file(temp_path);
                    OutputError::new("replace", target_path, error)
                })?;
                fs::rename(temp_path, target_path).map_err(|error| {
                    let _ = fs::remove_file(temp_path);
                    OutputError::new("move temporary file onto", target_path, error)
                })
            } else {
                let _ = fs::remove_file(temp_path);
                Err(OutputError::new("move temporary file onto", target_path, first_error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators_and_lowercases() {
        assert_eq!(city_slug("Portland, OR"), "portland_or");
        assert_eq!(city_slug("  St. Louis  "), "st_louis");
        assert_eq!(city_slug("San José"), "san_jos");
        assert_eq!(city_slug("---"), "map");
        assert_eq!(city_slug(""), "map");
    }

    #[test]
    fn output_path_is_keyed_by_city() {
        let path = output_path(Path::new("out"), "New York City");
        assert_eq!(path, Path::new("out").join("new_york_city_school_transit_map.html"));
    }

    #[test]
    fn write_html_creates_directories_and_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("map.html");

        write_html(&path, "<p>first</p>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>first</p>");

        write_html(&path, "<p>second</p>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>second</p>");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }
}
