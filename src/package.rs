use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{ReconstructError, Result};
use crate::fetch;
use crate::version::{self, PackageVersion};

/// Recipe member carried by current packaging layouts.
pub const META_TEMPLATE_MEMBER: &str = "info/recipe/meta.yaml.template";
/// Rendered recipe member, the only one present in older layouts.
pub const META_MEMBER: &str = "info/recipe/meta.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Git,
    Archive,
}

/// A binary package artifact and the metadata read out of its tarball.
#[derive(Debug, Clone)]
pub struct Package {
    /// The URL or path the artifact was named by.
    pub locator: String,
    /// Tarball basename; carries the `<name>-<base>-<build>` version string.
    pub filename: String,
    /// Package name from the recipe, falling back to the filename prefix.
    pub name: String,
    git_url: Option<String>,
    archive_url: Option<String>,
}

impl Package {
    /// Opens an artifact by URL or local path and reads its recipe
    /// metadata.
    ///
    /// Remote artifacts (`http:`/`https:`) are downloaded to a scratch
    /// directory first; `file:` URLs are treated as local paths. The recipe
    /// is read from `info/recipe/meta.yaml.template`, falling back to
    /// `info/recipe/meta.yaml` for older packaging layouts. A package with
    /// neither member fails with a metadata error and is skipped by the
    /// caller.
    pub fn open(locator: &str, tar_cmd: &[String]) -> Result<Package> {
        let remote = locator.starts_with("http:") || locator.starts_with("https:");
        let local_path = if remote {
            None
        } else {
            let stripped = locator
                .strip_prefix("file://")
                .or_else(|| locator.strip_prefix("file:"))
                .unwrap_or(locator);
            Some(PathBuf::from(stripped))
        };

        if let Some(path) = &local_path {
            if !path.exists() {
                return Err(
                    io::Error::new(io::ErrorKind::NotFound, path.display().to_string()).into(),
                );
            }
        }

        let filename = locator.rsplit('/').next().unwrap_or(locator).to_string();

        let scratch = tempfile::tempdir()?;
        let tarball = match &local_path {
            Some(path) => path.clone(),
            None => {
                let dest = scratch.path().join(&filename);
                fetch::download(locator, &dest)?;
                dest
            }
        };

        let recipe = read_recipe(tar_cmd, &tarball, scratch.path(), locator)?;
        let name = scan_value(&recipe, "name").unwrap_or_else(|| {
            filename.split('-').next().unwrap_or_default().to_string()
        });

        Ok(Package {
            locator: locator.to_string(),
            filename,
            name,
            git_url: scan_value(&recipe, "git_url"),
            archive_url: scan_value(&recipe, "url"),
        })
    }

    /// Decodes the artifact's version string from its filename.
    pub fn version(&self) -> Result<PackageVersion> {
        version::parse(&self.filename)
    }

    /// The source this artifact was built from. Git repositories are
    /// preferred over plain archives; only those two kinds are understood.
    pub fn source(&self) -> Option<(SourceType, &str)> {
        if let Some(url) = &self.git_url {
            return Some((SourceType::Git, url.as_str()));
        }
        if let Some(url) = &self.archive_url {
            return Some((SourceType::Archive, url.as_str()));
        }
        None
    }
}

fn read_recipe(tar_cmd: &[String], tarball: &Path, scratch: &Path, locator: &str) -> Result<String> {
    match fetch::extract_member(tar_cmd, tarball, scratch, META_TEMPLATE_MEMBER) {
        Ok(path) => Ok(fs::read_to_string(path)?),
        Err(_) => {
            // Older packaging layouts ship only the rendered recipe.
            let path = fetch::extract_member(tar_cmd, tarball, scratch, META_MEMBER)
                .map_err(|_| {
                    ReconstructError::metadata(format!("{}: package lacks recipe metadata", locator))
                })?;
            Ok(fs::read_to_string(path)?)
        }
    }
}

/// Pulls a scalar recipe value out by key.
///
/// The template member is Jinja-templated YAML, so a strict parser would
/// choke on it; a line scan over the keys this tool needs is enough. Values
/// that are themselves template expressions are treated as absent. A key
/// with an empty value followed by a list item takes the first item, for
/// recipes that give `source/url` as a list.
fn scan_value(recipe: &str, key: &str) -> Option<String> {
    let scalar = Regex::new(&format!(r"(?m)^\s*{}:[ \t]*(.*)$", key)).ok()?;
    let value = scalar
        .captures(recipe)
        .map(|caps| caps[1].trim().trim_matches(|c| c == '"' || c == '\'').to_string())?;

    let value = if value.is_empty() || value == "[" {
        let list = Regex::new(&format!(r"(?m)^\s*{}:[ \t]*\n\s*-[ \t]*(\S+)", key)).ok()?;
        list.captures(recipe)?[1]
            .trim_matches(|c: char| c == '"' || c == '\'' || c == ',')
            .to_string()
    } else {
        value
    };

    if value.is_empty() || value.contains("{{") {
        return None;
    }
    Some(value)
}
