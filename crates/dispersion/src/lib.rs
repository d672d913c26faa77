pub mod bessel;
pub mod calibration;
mod config;
mod error;
mod fit;
pub mod locator;
mod pick;
pub mod predictor;
mod reference;
mod seed;
mod signal;
pub mod tracker;
mod uncertainty;
mod window;
mod zeros;

#[cfg(test)]
mod test_support;

pub use calibration::{CalibrationOutcome, Resolution, TrackAttempt, calibrate};
pub use config::TrackerConfig;
pub use error::{ConfigError, ReferenceError, SignalError, TrackError, TrackResult, ZeroTableError};
pub use fit::{Polynomial, polyfit};
pub use pick::{AnnotatedPick, Feature, Pick, phase_velocity};
pub use predictor::{AnchoredReferencePredictor, Prediction, Predictor};
pub use reference::ReferenceCurve;
pub use seed::{Seed, select_seed};
pub use signal::Signal;
pub use tracker::{Direction, TrackInputs, Tracker};
pub use uncertainty::{annotate, estimate_error};
pub use window::Window;
pub use zeros::{ZeroTable, ZeroTables};
