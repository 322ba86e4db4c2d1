//! Bandcurve - frequency-response curves from band energy reports
//!
//! An audio analysis service summarises a track as six energy ratios, one per
//! named frequency band. Bandcurve turns those six numbers into a smooth
//! curve across the audible range (20 Hz - 20 kHz) that a chart can plot on a
//! log-frequency axis, plus the measured bands as markers.
//!
//! # Pipeline
//!
//! ```text
//! report JSON ─► payload ─► curve::bands ─► curve::synth ─► report (JSON/CSV)
//!                (decode)   (6 bands +      (dB, log grid,
//!                           centers)         interpolation)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use bandcurve::{RenderStatus, Renderer};
//!
//! let renderer = Renderer::new();
//! let result = renderer.render_file("analysis.json");
//!
//! match (result.status, &result.main) {
//!     (RenderStatus::Rendered, Some(curve)) => {
//!         for p in &curve.measured {
//!             println!("{:<10} {:>6} Hz {:>7.1} dB", p.band_name, p.frequency_hz, p.level_db);
//!         }
//!     }
//!     (RenderStatus::Error, _) => println!("Couldn't read report: {:?}", result.error),
//!     _ => println!("No energy bands in report"),
//! }
//! ```
//!
//! # Band Table
//!
//! | Band | Center |
//! |------|--------|
//! | Sub | 40 Hz |
//! | Bass | 130 Hz |
//! | Low_mids | 400 Hz |
//! | Mids | 1.8 kHz |
//! | High_mids | 5.5 kHz |
//! | Air | 14 kHz |
//!
//! # Modules
//!
//! - [`payload`]: permissive decoding of the analysis report
//! - [`curve`]: band extraction and curve synthesis
//! - [`renderer`]: report to curve pipeline with per-file status
//! - [`report`]: output formatters (JSON, CSV)

pub mod curve;
pub mod payload;
pub mod renderer;
pub mod report;

pub use curve::{
    CurveConfig, CurveError, CurvePoint, MeasuredPoint, SpectralCurve, BAND_CENTERS,
};
pub use payload::{AnalysisReport, PayloadError};
pub use renderer::{CurveReport, RenderStatus, Renderer, TrackMetrics};
