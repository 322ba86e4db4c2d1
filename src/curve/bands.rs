//! Band sample extraction
//!
//! The analysis backend reports six named energy bands. Each one is pinned to
//! a representative center frequency so it can be placed on a log axis:
//!
//! ```text
//! Band       | Backend range (Hz) | Center (Hz)
//! -----------|--------------------|------------
//! Sub        | 20 - 60            | 40
//! Bass       | 61 - 200           | 130
//! Low_mids   | 201 - 600          | 400
//! Mids       | 601 - 3000         | 1800
//! High_mids  | 3001 - 8000        | 5500
//! Air        | 8001 - 20000       | 14000
//! ```
//!
//! Absent bands stay absent. A missing value is "no measurement", and
//! injecting a zero would pull the neighbouring curve down toward the floor.

use serde_json::Value;
use std::collections::BTreeMap;

/// Band name to center frequency, in ascending frequency order.
pub const BAND_CENTERS: [(&str, f64); 6] = [
    ("Sub", 40.0),
    ("Bass", 130.0),
    ("Low_mids", 400.0),
    ("Mids", 1800.0),
    ("High_mids", 5500.0),
    ("Air", 14000.0),
];

/// Look up the center frequency for a band name. Names are case-sensitive,
/// matching the keys the backend emits.
pub fn center_frequency(band_name: &str) -> Option<f64> {
    BAND_CENTERS
        .iter()
        .find(|(name, _)| *name == band_name)
        .map(|&(_, freq)| freq)
}

/// One recognized band measurement, before dB conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSample {
    pub band_name: String,
    pub center_frequency_hz: f64,
    /// Linear power ratio as reported by the backend
    pub raw_energy: f64,
}

/// Pick the recognized bands out of an `energy_bands` mapping.
///
/// Output follows the table order, so bands that share a center frequency
/// keep a stable order after sorting. Unknown keys, `null`, and non-numeric
/// values are dropped.
pub fn extract_band_samples(energy_bands: &BTreeMap<String, Value>) -> Vec<BandSample> {
    BAND_CENTERS
        .iter()
        .filter_map(|&(name, center)| {
            let raw_energy = energy_bands.get(name)?.as_f64()?;
            Some(BandSample {
                band_name: name.to_string(),
                center_frequency_hz: center,
                raw_energy,
            })
        })
        .collect()
}
