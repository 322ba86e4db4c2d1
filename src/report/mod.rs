//! Output writers for rendered curves
//!
//! - **JSON**: full curves for a chart front end to plot directly
//! - **CSV**: one row per point, for spreadsheets and plotting scripts
//!
//! # Usage
//!
//! ```ignore
//! use bandcurve::report;
//!
//! // Picks the format from the extension
//! report::generate("curves.json", &results)?;  // JSON
//! report::generate("curves.csv", &results)?;   // CSV
//! ```

pub mod csv;
pub mod json;

use crate::renderer::{CurveReport, RenderStatus};
use chrono::Local;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Write a report in the format implied by the file extension. Anything that
/// isn't `.json` is written as CSV.
pub fn generate<P: AsRef<Path>>(path: P, results: &[CurveReport]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, results),
        _ => csv::write(&mut file, results),
    }
}

/// Create `dir` if needed and return a timestamped JSON report path inside it.
pub fn auto_path<P: AsRef<Path>>(dir: P) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("bandcurve_{}.json", timestamp)))
}

/// Status counts for a batch of results
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub rendered: usize,
    pub empty: usize,
    pub error: usize,
    /// Results that also carry a reference curve
    pub with_reference: usize,
}

impl Summary {
    pub fn from_results(results: &[CurveReport]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for r in results {
            match r.status {
                RenderStatus::Rendered => summary.rendered += 1,
                RenderStatus::Empty => summary.empty += 1,
                RenderStatus::Error => summary.error += 1,
            }
            if r.reference.is_some() {
                summary.with_reference += 1;
            }
        }

        summary
    }
}
