//! Curve synthesis from band samples
//!
//! Band energies are converted to dB, sorted by frequency, and resampled onto
//! a log-spaced grid. Between two measured bands the level is interpolated
//! linearly against `log10(freq)`, which draws a straight segment on a
//! semi-log chart. Outside the measured range the nearest band's level is
//! held flat.
//!
//! ```text
//!  dB
//!   |  ______
//!   |        \___                 ______
//!   |            \___ ______/\___/
//!   +-----|---------|-------|-----|-------> log(f)
//!        40        400    1800  14000
//! ```

use super::bands::BandSample;
use super::{CurveConfig, CurveError, CurvePoint, MeasuredPoint, SpectralCurve};
use log::debug;

/// Lowest energy ratio considered distinct from silence.
pub const ENERGY_FLOOR: f64 = 1e-12;

/// Level reported for energies at or below [`ENERGY_FLOOR`].
pub const FLOOR_DB: f64 = -120.0;

/// Convert a linear power ratio to dB, clamped at the -120 dB noise floor.
///
/// Zero, negative, and NaN inputs all map to [`FLOOR_DB`].
pub fn energy_to_db(energy: f64) -> f64 {
    if energy.is_nan() || energy <= ENERGY_FLOOR {
        return FLOOR_DB;
    }
    10.0 * energy.log10()
}

/// Convert band samples to measured points sorted by ascending frequency.
///
/// The sort is stable, so equal frequencies keep their input order.
pub fn measured_points(samples: &[BandSample]) -> Vec<MeasuredPoint> {
    let mut points: Vec<MeasuredPoint> = samples
        .iter()
        .map(|s| MeasuredPoint {
            frequency_hz: s.center_frequency_hz,
            level_db: energy_to_db(s.raw_energy),
            band_name: s.band_name.clone(),
        })
        .collect();
    points.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
    points
}

/// Generate `n` log-uniformly spaced frequencies from `f_min` to `f_max`.
///
/// The endpoints are pinned so they come out exact despite the round trip
/// through `log10`/`powf`.
pub fn log_frequency_grid(n: usize, f_min: f64, f_max: f64) -> Vec<f64> {
    if n < 2 {
        return vec![f_min];
    }
    let log_min = f_min.log10();
    let log_max = f_max.log10();
    let step = (log_max - log_min) / (n - 1) as f64;

    (0..n)
        .map(|i| match i {
            0 => f_min,
            i if i == n - 1 => f_max,
            i => 10f64.powf(log_min + i as f64 * step),
        })
        .collect()
}

/// Level at `freq` given measured points sorted by frequency.
///
/// Returns `None` only for an empty slice.
pub fn level_at(points: &[MeasuredPoint], freq: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;

    if freq <= first.frequency_hz {
        return Some(first.level_db);
    }
    if freq >= last.frequency_hz {
        return Some(last.level_db);
    }

    // First index with frequency >= freq. The bounds checks above keep it in
    // 1..len, and points[idx - 1] < freq <= points[idx] is the first pair that
    // brackets freq even when frequencies repeat.
    let idx = points.partition_point(|p| p.frequency_hz < freq);
    let p1 = &points[idx - 1];
    let p2 = &points[idx];

    let log_f1 = p1.frequency_hz.log10();
    let log_f2 = p2.frequency_hz.log10();
    let t = ((freq.log10() - log_f1) / (log_f2 - log_f1)).clamp(0.0, 1.0);

    Some(p1.level_db + t * (p2.level_db - p1.level_db))
}

/// Build the dense curve for a set of band samples.
///
/// Fails with [`CurveError::EmptyInput`] when there is nothing to anchor the
/// curve to. A single sample yields a flat curve at that sample's level.
pub fn synthesize(samples: &[BandSample], config: &CurveConfig) -> Result<SpectralCurve, CurveError> {
    if samples.is_empty() {
        return Err(CurveError::EmptyInput);
    }

    let measured = measured_points(samples);
    let grid = log_frequency_grid(config.points(), config.min_freq_hz(), config.max_freq_hz());

    let curve = grid
        .into_iter()
        .map(|frequency_hz| {
            level_at(&measured, frequency_hz)
                .map(|level_db| CurvePoint { frequency_hz, level_db })
                .ok_or(CurveError::EmptyInput)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "synthesized {} curve points from {} band(s): {}",
        curve.len(),
        measured.len(),
        measured
            .iter()
            .map(|p| format!("{}@{}Hz={:.1}dB", p.band_name, p.frequency_hz, p.level_db))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(SpectralCurve { curve, measured })
}
