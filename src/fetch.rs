use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ReconstructError, Result};
use crate::exec;

/// Downloads a URL to a local file, streaming the body to disk.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| ReconstructError::Download(format!("{}: {}", url, e)))?;
    let mut reader = response.into_reader();
    let mut file = fs::File::create(dest)?;
    io::copy(&mut reader, &mut file)?;
    Ok(())
}

/// Unpacks an archive into `dest` using the configured tar command.
///
/// Artifacts are bzip2-compressed tarballs; the system tar autodetects the
/// compression from the file.
pub fn untar(tar_cmd: &[String], archive: &Path, dest: &Path) -> Result<()> {
    let mut parts = tar_cmd.to_vec();
    parts.push("-xf".to_string());
    parts.push(archive.display().to_string());
    parts.push("-C".to_string());
    parts.push(dest.display().to_string());
    exec::run(&parts)?;
    Ok(())
}

/// Extracts a single member from an archive into `dest`, returning the path
/// it landed at. A member absent from the archive is a recoverable metadata
/// error so the caller can fall back to an older layout.
pub fn extract_member(
    tar_cmd: &[String],
    archive: &Path,
    dest: &Path,
    member: &str,
) -> Result<PathBuf> {
    let mut parts = tar_cmd.to_vec();
    parts.push("-xf".to_string());
    parts.push(archive.display().to_string());
    parts.push("-C".to_string());
    parts.push(dest.display().to_string());
    parts.push(member.to_string());

    exec::run(&parts)
        .map_err(|e| ReconstructError::metadata(format!("missing archive member {}: {}", member, e)))?;

    let extracted = dest.join(member);
    if !extracted.exists() {
        return Err(ReconstructError::metadata(format!(
            "archive member {} did not extract",
            member
        )));
    }
    Ok(extracted)
}
