use std::path::Path;

use crate::error::Result;
use crate::exec;

/// Runs sloccount in multiproject mode over the reconstructed work tree and
/// returns the raw report.
pub fn report(sloccount_cmd: &[String], path: &Path) -> Result<String> {
    let mut parts = sloccount_cmd.to_vec();
    parts.push("--multiproject".to_string());
    parts.push(path.display().to_string());
    exec::run(&parts)
}
