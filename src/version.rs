use crate::error::{ReconstructError, Result};
use crate::offset;

/// The decoded form of an artifact's display version: the release tag it was
/// cut from and the (possibly anomaly-encoded) commit offset past it.
///
/// Produced once per package and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub base_tag: String,
    pub encoded_offset: i64,
}

/// Parses a version string of the form `<name>-<base>-<build>`.
///
/// Exactly three hyphen-delimited tokens are required. The middle token is
/// classified into one of three shapes:
///
/// 1. Contains `.dev`: a normal post-release version, e.g. `1.18.0.dev37`
///    means 37 commits past tag `1.18.0`.
/// 2. Contains `dev` without the dot: astropy's scheme, the only known
///    package that numbers its unreleased versions one minor ahead of the
///    last real tag. The minor component is decremented and the offset is
///    anomaly-encoded so the resolver indexes absolute history instead of
///    tag-relative history.
/// 3. Neither: the base is itself an exact release tag, offset 0.
///
/// # Example
/// ```ignore
/// let v = parse("numpy-1.18.0.dev37-0").unwrap();
/// assert_eq!(v.base_tag, "1.18.0");
/// assert_eq!(v.encoded_offset, 37);
/// ```
pub fn parse(version_string: &str) -> Result<PackageVersion> {
    let parts: Vec<&str> = version_string.split('-').collect();
    if parts.len() != 3 {
        return Err(ReconstructError::malformed_version(format!(
            "expected <name>-<base>-<build>, got '{}'",
            version_string
        )));
    }
    let base = parts[1];

    if let Some((tag, digits)) = base.split_once(".dev") {
        let post_commit = parse_offset(digits, version_string)?;
        return Ok(PackageVersion {
            base_tag: tag.to_string(),
            encoded_offset: post_commit as i64,
        });
    }

    if let Some((tag_raw, digits)) = base.split_once("dev") {
        // astropy is the only known package with this scheme: its dev
        // version names a minor that was never tagged, one ahead of the
        // last real release.
        let post_commit = parse_offset(digits, version_string)?;
        let (major, minor) = split_major_minor(tag_raw, version_string)?;
        let minor = minor.checked_sub(1).ok_or_else(|| {
            ReconstructError::malformed_version(format!(
                "cannot decrement minor version of '{}' in '{}'",
                tag_raw, version_string
            ))
        })?;
        return Ok(PackageVersion {
            base_tag: format!("v{}.{}", major, minor),
            encoded_offset: offset::encode_anomalous(post_commit),
        });
    }

    Ok(PackageVersion {
        base_tag: base.to_string(),
        encoded_offset: 0,
    })
}

fn parse_offset(digits: &str, context: &str) -> Result<u32> {
    digits.parse::<u32>().map_err(|_| {
        ReconstructError::malformed_version(format!(
            "offset '{}' in '{}' is not a non-negative integer",
            digits, context
        ))
    })
}

fn split_major_minor(tag: &str, context: &str) -> Result<(u32, u32)> {
    let (major, minor) = tag.split_once('.').ok_or_else(|| {
        ReconstructError::malformed_version(format!(
            "expected major.minor in '{}' from '{}'",
            tag, context
        ))
    })?;
    let major = major.parse::<u32>().map_err(|_| {
        ReconstructError::malformed_version(format!("bad major version in '{}'", context))
    })?;
    let minor = minor.parse::<u32>().map_err(|_| {
        ReconstructError::malformed_version(format!("bad minor version in '{}'", context))
    })?;
    Ok((major, minor))
}
