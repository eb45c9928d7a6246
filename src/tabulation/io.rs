//! Saving and loading tabulations as JSON files
use super::TabulationCache;
use crate::types::{Error, FloatingPointPrecision, Result};
use cauchy::c64;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk layout of a tabulation.
#[derive(Debug, Serialize, Deserialize)]
struct TabulationFile {
    precision: FloatingPointPrecision,
    r_range: Vec<f64>,
    z_range: Vec<f64>,
    values_re: Vec<f64>,
    values_im: Vec<f64>,
    #[serde(default)]
    valid: bool,
}

impl TabulationCache {
    /// Write the tabulation to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = TabulationFile {
            precision: self.precision,
            r_range: self.r_range.clone(),
            z_range: self.z_range.clone(),
            values_re: self.values.iter().map(|v| v.re).collect(),
            values_im: self.values.iter().map(|v| v.im).collect(),
            valid: self.valid,
        };
        let content = serde_json::to_string(&file).map_err(|e| Error::Io(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Io(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        info!("Saved tabulation to {}", path.display());
        Ok(())
    }

    /// Read a tabulation from a JSON file written by [TabulationCache::save].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        let file: TabulationFile =
            serde_json::from_str(&content).map_err(|e| Error::Io(e.to_string()))?;
        if file.values_re.len() != file.values_im.len() {
            return Err(Error::Io(format!(
                "{}: real and imaginary parts have different lengths",
                path.display()
            )));
        }
        let mut cache = TabulationCache::new(file.r_range, file.z_range, file.precision)?;
        let values = file
            .values_re
            .into_iter()
            .zip(file.values_im)
            .map(|(re, im)| c64::new(re, im))
            .collect();
        cache.set_values(values)?;
        cache.valid = file.valid;
        info!("Loaded tabulation from {}", path.display());
        Ok(cache)
    }
}
