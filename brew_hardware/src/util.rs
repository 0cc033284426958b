use std::path::Path;

use crate::error::{HwError, Result};

/// Read a sysfs/OWFS attribute file and strip surrounding whitespace.
///
/// Both interfaces pad values (OWFS right-aligns numbers to 12 columns,
/// sysfs appends a newline).
pub fn read_trimmed(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|e| HwError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(raw.trim().to_string())
}
