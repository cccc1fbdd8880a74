//! # File I/O Module
//!
//! Reads scenarios and criteria from JSON and writes loss results.
//!
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Validation on load**: Criteria are validated before they are returned
//!
//! ## Example
//!
//! ```rust,no_run
//! use loss_core::file_io::{load_criteria, load_scenario};
//! use std::path::Path;
//!
//! let scenario = load_scenario(Path::new("girder.json"))?;
//! let criteria = load_criteria(Path::new("criteria.json"))?;
//! # Ok::<(), loss_core::errors::LossError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::criteria::LossCriteria;
use crate::errors::{LossError, LossResult};
use crate::scenario::GirderScenario;

/// Load a girder scenario from a JSON file.
pub fn load_scenario(path: &Path) -> LossResult<GirderScenario> {
    read_json(path)
}

/// Load loss criteria from a JSON file.
///
/// Missing fields take their default values. The criteria are validated.
pub fn load_criteria(path: &Path) -> LossResult<LossCriteria> {
    let criteria: LossCriteria = read_json(path)?;
    criteria.validate()?;
    Ok(criteria)
}

/// Save any serializable results as pretty JSON with an atomic write.
///
/// The data is written to `<path>.tmp`, synced to disk, then renamed over
/// `path`, so a crash never leaves a truncated file behind.
pub fn save_results<T: Serialize + ?Sized>(results: &T, path: &Path) -> LossResult<()> {
    let json = serde_json::to_string_pretty(results).map_err(|e| LossError::SerializationError {
        reason: e.to_string(),
    })?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let tmp_error = |operation: &str, e: std::io::Error| {
        LossError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(tmp_path).map_err(|e| tmp_error("create temp file", e))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| tmp_error("write temp file", e))?;

    tmp_file
        .sync_all()
        .map_err(|e| tmp_error("sync temp file", e))?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        LossError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LossResult<T> {
    let mut file = File::open(path)
        .map_err(|e| LossError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| LossError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| LossError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}
