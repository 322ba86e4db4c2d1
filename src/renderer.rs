//! Report to curve pipeline
//!
//! [`Renderer`] takes a decoded (or on-disk) analysis report and produces a
//! [`CurveReport`] for the analysed track, the optional reference track, and
//! the difference between them. Rendering never fails outright: problems are
//! recorded in the result's status so a batch keeps going.

use crate::curve::{difference, CurveConfig, CurveError, CurvePoint, SpectralCurve};
use crate::payload::{self, AnalysisReport, Features};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    /// Main curve synthesized
    Rendered,
    /// Payload had no recognized energy bands
    Empty,
    /// Payload could not be read or decoded
    Error,
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStatus::Rendered => write!(f, "OK"),
            RenderStatus::Empty => write!(f, "EMPTY"),
            RenderStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Headline numbers shown next to the curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness_lufs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_peak_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crest_factor_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_bpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tonal_stability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereo_width_label: Option<String>,
}

impl TrackMetrics {
    /// Collect whatever metrics the features carry. `None` when there are none.
    pub fn from_features(features: &Features) -> Option<Self> {
        let loudness = features.loudness_features.as_ref();
        let harmonic = features.harmonic_features.as_ref();

        let metrics = Self {
            loudness_lufs: loudness.and_then(|l| l.loudness_lufs),
            rms_db: loudness.and_then(|l| l.rms_db),
            true_peak_db: loudness.and_then(|l| l.true_peak_db),
            crest_factor_db: loudness.and_then(|l| l.crest_factor_db),
            tempo_bpm: features.tempo_features.as_ref().and_then(|t| t.tempo_bpm),
            estimated_key: harmonic.and_then(|h| h.estimated_key.clone()),
            tonal_stability: harmonic.and_then(|h| h.tonal_stability),
            stereo_width_label: features
                .stereo_image_features
                .as_ref()
                .and_then(|s| s.stereo_width_label.clone()),
        };

        (metrics != Self::default()).then_some(metrics)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    pub file_path: String,
    pub file_name: String,
    pub status: RenderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<SpectralCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<SpectralCurve>,
    /// `main - reference` per grid point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Vec<CurvePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_tilt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TrackMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_metrics: Option<TrackMetrics>,
    /// Text summary from the analysis service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CurveReport {
    fn failed(file_path: String, file_name: String, error: String) -> Self {
        Self {
            file_path,
            file_name,
            status: RenderStatus::Error,
            main: None,
            reference: None,
            difference: None,
            spectral_tilt: None,
            metrics: None,
            reference_metrics: None,
            summary: None,
            error: Some(error),
        }
    }

    /// Number of measured bands behind the main curve.
    pub fn band_count(&self) -> usize {
        self.main.as_ref().map(|c| c.measured.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: CurveConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CurveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Read a report from disk and render it.
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> CurveReport {
        let path = path.as_ref();
        let file_path = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.clone());

        match payload::load(path) {
            Ok(report) => {
                let mut result = self.render(&report, &file_name);
                result.file_path = file_path;
                result
            }
            Err(e) => {
                warn!("{}: {}", file_path, e);
                CurveReport::failed(file_path, file_name, e.to_string())
            }
        }
    }

    /// Render an already-decoded report. `name` labels the result.
    pub fn render(&self, report: &AnalysisReport, name: &str) -> CurveReport {
        let features = report.features();
        let reference_features = report.reference_features();
        let main = self.curve_for(features, name, "main");
        let reference = self.curve_for(reference_features, name, "reference");

        let difference = match (&main, &reference) {
            (Some(m), Some(r)) => difference(m, r),
            _ => None,
        };

        let status = if main.is_some() {
            RenderStatus::Rendered
        } else {
            RenderStatus::Empty
        };

        CurveReport {
            file_path: name.to_string(),
            file_name: name.to_string(),
            status,
            main,
            reference,
            difference,
            spectral_tilt: features.and_then(Features::spectral_tilt),
            metrics: features.and_then(TrackMetrics::from_features),
            reference_metrics: reference_features.and_then(TrackMetrics::from_features),
            summary: report.summary().map(str::to_string),
            error: None,
        }
    }

    fn curve_for(&self, features: Option<&Features>, name: &str, which: &str) -> Option<SpectralCurve> {
        let bands = features?.energy_bands()?;
        match SpectralCurve::from_energy_bands(bands, &self.config) {
            Ok(curve) => Some(curve),
            Err(CurveError::EmptyInput) => {
                debug!("{}: {} track has no recognized energy bands", name, which);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn report(json: &str) -> AnalysisReport {
        payload::from_str(json).unwrap()
    }

    // ==========================================================================
    // STATUS
    // ==========================================================================

    #[test]
    fn test_status_display() {
        assert_eq!(RenderStatus::Rendered.to_string(), "OK");
        assert_eq!(RenderStatus::Empty.to_string(), "EMPTY");
        assert_eq!(RenderStatus::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RenderStatus::Rendered).unwrap(), "\"rendered\"");
    }

    // ==========================================================================
    // RENDERING DECODED REPORTS
    // ==========================================================================

    #[test]
    fn test_render_main_only() {
        let r = report(
            r#"{"features": {"frequency_spectrum_features": {
                "energy_bands": {"Sub": 1e-6, "Bass": 1e-4, "Mids": 1e-2},
                "spectral_tilt": -1.5
            }}}"#,
        );
        let result = Renderer::new().render(&r, "track.json");

        assert_eq!(result.status, RenderStatus::Rendered);
        assert_eq!(result.band_count(), 3);
        assert_eq!(result.main.as_ref().unwrap().curve.len(), 151);
        assert!(result.reference.is_none());
        assert!(result.difference.is_none());
        assert_eq!(result.spectral_tilt, Some(-1.5));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_render_with_reference() {
        let r = report(
            r#"{"report": {
                "features": {"frequency_spectrum_features": {"energy_bands": {"Mids": 0.1}}},
                "ref_features": {"frequency_spectrum_features": {"energy_bands": {"Mids": 0.01}}}
            }}"#,
        );
        let result = Renderer::new().render(&r, "pair");

        assert_eq!(result.status, RenderStatus::Rendered);
        assert!(result.reference.is_some());
        let diff = result.difference.unwrap();
        assert!(diff.iter().all(|p| (p.level_db - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_render_empty_reference_keeps_main() {
        let r = report(
            r#"{
                "features": {"frequency_spectrum_features": {"energy_bands": {"Air": 0.2}}},
                "ref_features": {"frequency_spectrum_features": {"energy_bands": {}}}
            }"#,
        );
        let result = Renderer::new().render(&r, "x");

        assert_eq!(result.status, RenderStatus::Rendered);
        assert!(result.reference.is_none());
        assert!(result.difference.is_none());
    }

    #[test]
    fn test_render_no_recognized_bands() {
        let r = report(r#"{"features": {"frequency_spectrum_features": {"energy_bands": {"Hum": 1.0}}}}"#);
        let result = Renderer::new().render(&r, "x");

        assert_eq!(result.status, RenderStatus::Empty);
        assert!(result.main.is_none());
        assert_eq!(result.band_count(), 0);
    }

    #[test]
    fn test_render_no_features() {
        let result = Renderer::new().render(&AnalysisReport::default(), "x");
        assert_eq!(result.status, RenderStatus::Empty);
    }

    #[test]
    fn test_render_carries_metrics_and_summary() {
        let r = report(
            r#"{"report": {
                "summary": "Loud master, narrow image.",
                "features": {
                    "frequency_spectrum_features": {"energy_bands": {"Mids": 0.1}},
                    "loudness_features": {"loudness_lufs": -8.2, "true_peak_db": 0.4},
                    "tempo_features": {"tempo_bpm": 128.0},
                    "harmonic_features": {"estimated_key": "A"},
                    "stereo_image_features": {"stereo_width_label": "narrow"}
                },
                "ref_features": {"loudness_features": {"loudness_lufs": -14.0}}
            }}"#,
        );
        let result = Renderer::new().render(&r, "x");

        assert_eq!(result.summary.as_deref(), Some("Loud master, narrow image."));
        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.loudness_lufs, Some(-8.2));
        assert_eq!(metrics.true_peak_db, Some(0.4));
        assert_eq!(metrics.rms_db, None);
        assert_eq!(metrics.tempo_bpm, Some(128.0));
        assert_eq!(metrics.estimated_key.as_deref(), Some("A"));
        assert_eq!(metrics.stereo_width_label.as_deref(), Some("narrow"));
        assert_eq!(result.reference_metrics.unwrap().loudness_lufs, Some(-14.0));
    }

    #[test]
    fn test_render_without_metrics() {
        let r = report(r#"{"features": {"frequency_spectrum_features": {"energy_bands": {"Mids": 0.1}}}}"#);
        let result = Renderer::new().render(&r, "x");

        assert!(result.metrics.is_none());
        assert!(result.reference_metrics.is_none());
        assert!(result.summary.is_none());
    }

    #[test]
    fn test_render_mistyped_metric_keeps_curve() {
        let r = report(
            r#"{"features": {
                "frequency_spectrum_features": {"energy_bands": {"Sub": 1e-6, "Mids": 1e-2}},
                "loudness_features": {"loudness_lufs": "N/A"}
            }}"#,
        );
        let result = Renderer::new().render(&r, "x");

        assert_eq!(result.status, RenderStatus::Rendered);
        assert_eq!(result.band_count(), 2);
        assert!(result.metrics.is_none());
    }

    #[test]
    fn test_render_uses_config() {
        let config = CurveConfig::new(31, 20.0, 20000.0).unwrap();
        let r = report(r#"{"features": {"frequency_spectrum_features": {"energy_bands": {"Bass": 0.5}}}}"#);
        let result = Renderer::new().with_config(config).render(&r, "x");

        assert_eq!(result.main.unwrap().curve.len(), 31);
    }

    // ==========================================================================
    // RENDERING FILES
    // ==========================================================================

    #[test]
    fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mix.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"features": {{"frequency_spectrum_features": {{"energy_bands": {{"Sub": 0.2, "Air": 0.01}}}}}}}}"#
        )
        .unwrap();

        let result = Renderer::new().render_file(&path);
        assert_eq!(result.status, RenderStatus::Rendered);
        assert_eq!(result.file_name, "mix.json");
        assert_eq!(result.file_path, path.display().to_string());
    }

    #[test]
    fn test_render_file_mistyped_metric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"{"features": {
                "frequency_spectrum_features": {"energy_bands": {"Sub": 1e-6, "Mids": 1e-2}},
                "loudness_features": {"loudness_lufs": "N/A"}
            }}"#,
        )
        .unwrap();

        let result = Renderer::new().render_file(&path);
        assert_eq!(result.status, RenderStatus::Rendered);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_render_file_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"features\": [").unwrap();

        let result = Renderer::new().render_file(&path);
        assert_eq!(result.status, RenderStatus::Error);
        assert!(result.error.unwrap().starts_with("JSON error"));
        assert!(result.main.is_none());
    }

    #[test]
    fn test_render_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = Renderer::new().render_file(dir.path().join("gone.json"));
        assert_eq!(result.status, RenderStatus::Error);
        assert_eq!(result.file_name, "gone.json");
    }
}
