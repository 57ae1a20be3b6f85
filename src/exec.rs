use std::process::Command;

use crate::error::{ReconstructError, Result};

/// Characters that must never appear in a constructed command line. The
/// arguments come partly from package metadata, so anything that could
/// smuggle in a second shell command is refused outright.
pub const ESCAPE_CHARS: [char; 4] = ['\\', ';', '&', '|'];

/// Whether a command line is free of shell metacharacters.
pub fn safe_command(parts: &[String]) -> bool {
    !parts
        .iter()
        .any(|part| part.contains(|ch| ESCAPE_CHARS.contains(&ch)))
}

/// Runs an external tool and captures its stdout.
///
/// The program is looked up on PATH first so a missing tool reports as a
/// clear error rather than a spawn failure. A non-zero exit status is an
/// error carrying the tool's stderr.
pub fn run(parts: &[String]) -> Result<String> {
    let (program, args) = match parts.split_first() {
        Some(split) => split,
        None => return Err(ReconstructError::tool("empty command")),
    };

    if !safe_command(parts) {
        return Err(ReconstructError::UnsafeCommand(parts.join(" ")));
    }

    let program = which::which(program)
        .map_err(|_| ReconstructError::tool(format!("'{}' not found on PATH", program)))?;

    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(ReconstructError::tool(format!(
            "'{}' exited with {}: {}",
            parts.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
