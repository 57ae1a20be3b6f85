use std::fs;
use std::path::Path;

use crate::error::{ReconstructError, Result};

/// A parsed `@EXPLICIT` environment dump file: the list of artifact URLs to
/// reconstruct, after inclusion filtering.
#[derive(Debug, Clone)]
pub struct SpecFile {
    pub urls: Vec<String>,
}

impl SpecFile {
    /// Loads and filters an environment dump file.
    ///
    /// The file must carry the `@EXPLICIT` marker. Blank lines and lines
    /// starting with `#` or `@` are skipped. `include_pkgs` keeps URLs whose
    /// tarball basename starts with `<pattern>-`; `include_urls` keeps URLs
    /// containing a pattern anywhere. When both filters are given the
    /// package filter wins.
    pub fn load(path: &Path, include_pkgs: &[String], include_urls: &[String]) -> Result<Self> {
        let data = fs::read_to_string(path)?;

        if !data.contains("@EXPLICIT") {
            return Err(ReconstructError::SpecFileFormat(format!(
                "{} is not a valid environment dump file",
                path.display()
            )));
        }

        let lines: Vec<&str> = data.lines().collect();
        if lines.is_empty() {
            return Err(ReconstructError::spec_file("spec file contains no data"));
        }

        let mut all = Vec::new();
        let mut by_pkg = Vec::new();
        let mut by_url = Vec::new();

        for line in lines {
            let url = line.trim_end();
            if url.is_empty() || url.starts_with('#') || url.starts_with('@') {
                continue;
            }

            let tarball = url.rsplit('/').next().unwrap_or(url);

            if include_pkgs
                .iter()
                .any(|pattern| tarball.starts_with(&format!("{}-", pattern)))
            {
                by_pkg.push(url.to_string());
            }
            if include_urls.iter().any(|pattern| url.contains(pattern.as_str())) {
                by_url.push(url.to_string());
            }
            all.push(url.to_string());
        }

        let urls = if !include_pkgs.is_empty() {
            by_pkg
        } else if !include_urls.is_empty() {
            by_url
        } else {
            all
        };

        Ok(SpecFile { urls })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
