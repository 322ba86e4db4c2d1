//! Frequency-response curves from band energies
//!
//! Two stages turn an `energy_bands` mapping into something a chart can draw:
//!
//! 1. [`bands`]: pick out the six recognized bands and pin each to its center
//!    frequency.
//! 2. [`synth`]: convert to dB and resample onto a dense log-frequency grid.
//!
//! The result is a [`SpectralCurve`] holding both the dense curve (for the
//! filled area) and the measured points (for markers at their true position).

pub mod bands;
pub mod synth;

pub use bands::{center_frequency, extract_band_samples, BandSample, BAND_CENTERS};
pub use synth::{energy_to_db, level_at, log_frequency_grid, synthesize, ENERGY_FLOOR, FLOOR_DB};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_POINTS: usize = 151;
pub const DEFAULT_MIN_FREQ_HZ: f64 = 20.0;
pub const DEFAULT_MAX_FREQ_HZ: f64 = 20000.0;

#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// No recognized band was present, so there is nothing to render.
    #[error("no recognized energy bands to build a curve from")]
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("curve needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("frequency bounds must be finite and positive, got {min} - {max} Hz")]
    InvalidBounds { min: f64, max: f64 },

    #[error("minimum frequency {min} Hz must be below maximum {max} Hz")]
    EmptyRange { min: f64, max: f64 },
}

/// Sampling parameters for the dense curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveConfig {
    points: usize,
    min_freq_hz: f64,
    max_freq_hz: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            min_freq_hz: DEFAULT_MIN_FREQ_HZ,
            max_freq_hz: DEFAULT_MAX_FREQ_HZ,
        }
    }
}

impl CurveConfig {
    pub fn new(points: usize, min_freq_hz: f64, max_freq_hz: f64) -> Result<Self, ConfigError> {
        if points < 2 {
            return Err(ConfigError::TooFewPoints(points));
        }
        let valid = |f: f64| f.is_finite() && f > 0.0;
        if !valid(min_freq_hz) || !valid(max_freq_hz) {
            return Err(ConfigError::InvalidBounds { min: min_freq_hz, max: max_freq_hz });
        }
        if min_freq_hz >= max_freq_hz {
            return Err(ConfigError::EmptyRange { min: min_freq_hz, max: max_freq_hz });
        }
        Ok(Self { points, min_freq_hz, max_freq_hz })
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn min_freq_hz(&self) -> f64 {
        self.min_freq_hz
    }

    pub fn max_freq_hz(&self) -> f64 {
        self.max_freq_hz
    }
}

/// A measured band after dB conversion. Drawn as a marker and used as an
/// interpolation anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredPoint {
    pub frequency_hz: f64,
    pub level_db: f64,
    pub band_name: String,
}

/// One point of the dense, resampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub frequency_hz: f64,
    pub level_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralCurve {
    /// Dense curve, ascending frequency
    pub curve: Vec<CurvePoint>,
    /// Measured bands, ascending frequency
    pub measured: Vec<MeasuredPoint>,
}

impl SpectralCurve {
    /// Extract and synthesize in one step.
    pub fn from_energy_bands(
        energy_bands: &BTreeMap<String, Value>,
        config: &CurveConfig,
    ) -> Result<Self, CurveError> {
        synthesize(&extract_band_samples(energy_bands), config)
    }
}

/// Per-point `main - reference` levels.
///
/// Both curves must come from the same config so their grids line up;
/// returns `None` when the grids differ.
pub fn difference(main: &SpectralCurve, reference: &SpectralCurve) -> Option<Vec<CurvePoint>> {
    if main.curve.len() != reference.curve.len() {
        return None;
    }
    main.curve
        .iter()
        .zip(reference.curve.iter())
        .map(|(m, r)| {
            (m.frequency_hz.to_bits() == r.frequency_hz.to_bits()).then(|| CurvePoint {
                frequency_hz: m.frequency_hz,
                level_db: m.level_db - r.level_db,
            })
        })
        .collect()
}
