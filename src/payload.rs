//! Analysis report payload
//!
//! The analysis service has changed its report layout several times, so
//! every field here is optional and unknown keys are ignored. Features turn
//! up in two places depending on the service version:
//!
//! ```text
//! { "features": { "frequency_spectrum_features": { "energy_bands": {...} } } }
//! { "report": { "summary": "...", "features": {...}, "ref_features": {...} } }
//! ```
//!
//! Band values stay as raw JSON so a `null` or a stray string only drops
//! that band instead of failing the whole payload. Every other field goes
//! through [`lenient`], so a mistyped field reads as absent and only the
//! output built from it goes missing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode an optional field, treating a value of the wrong shape as absent.
///
/// Needs `#[serde(default)]` alongside it, since a custom deserializer is
/// never called for a missing key.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "lenient")]
    pub report: Option<ReportBody>,
    #[serde(default, deserialize_with = "lenient")]
    pub features: Option<Features>,
    #[serde(default, deserialize_with = "lenient")]
    pub ref_features: Option<Features>,
}

/// Text report produced alongside the numeric features.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportBody {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub features: Option<Features>,
    #[serde(default, deserialize_with = "lenient")]
    pub ref_features: Option<Features>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Features {
    #[serde(default, deserialize_with = "lenient")]
    pub frequency_spectrum_features: Option<FrequencySpectrumFeatures>,
    #[serde(default, deserialize_with = "lenient")]
    pub loudness_features: Option<LoudnessFeatures>,
    #[serde(default, deserialize_with = "lenient")]
    pub tempo_features: Option<TempoFeatures>,
    #[serde(default, deserialize_with = "lenient")]
    pub harmonic_features: Option<HarmonicFeatures>,
    #[serde(default, deserialize_with = "lenient")]
    pub stereo_image_features: Option<StereoImageFeatures>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FrequencySpectrumFeatures {
    #[serde(default, deserialize_with = "lenient")]
    pub energy_bands: Option<BTreeMap<String, Value>>,
    /// Slope of magnitude against log10(freq)
    #[serde(default, deserialize_with = "lenient")]
    pub spectral_tilt: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoudnessFeatures {
    #[serde(default, deserialize_with = "lenient")]
    pub loudness_lufs: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub rms_db: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub true_peak_db: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub crest_factor_db: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TempoFeatures {
    #[serde(default, deserialize_with = "lenient")]
    pub tempo_bpm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarmonicFeatures {
    #[serde(default, deserialize_with = "lenient")]
    pub tonal_stability: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StereoImageFeatures {
    #[serde(default, deserialize_with = "lenient")]
    pub stereo_width_label: Option<String>,
}

impl AnalysisReport {
    /// Features of the analysed track: top-level first, then the copy nested
    /// under `report`.
    pub fn features(&self) -> Option<&Features> {
        self.features
            .as_ref()
            .or_else(|| self.report.as_ref()?.features.as_ref())
    }

    /// Features of the reference track, if one was uploaded.
    pub fn reference_features(&self) -> Option<&Features> {
        self.ref_features
            .as_ref()
            .or_else(|| self.report.as_ref()?.ref_features.as_ref())
    }

    pub fn summary(&self) -> Option<&str> {
        self.report.as_ref()?.summary.as_deref()
    }
}

impl Features {
    pub fn energy_bands(&self) -> Option<&BTreeMap<String, Value>> {
        self.frequency_spectrum_features.as_ref()?.energy_bands.as_ref()
    }

    pub fn spectral_tilt(&self) -> Option<f64> {
        self.frequency_spectrum_features.as_ref()?.spectral_tilt
    }
}

pub fn from_str(s: &str) -> Result<AnalysisReport, PayloadError> {
    Ok(serde_json::from_str(s)?)
}

/// Read and decode a report file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AnalysisReport, PayloadError> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
