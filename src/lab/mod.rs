//! Bench services built on the diode model.
//!
//! - [`measure`] - single-point reading with instrument noise and an
//!   overheat check
//! - [`sweep`] - noiseless 300-point curve plus the knee point
//! - [`mystery`] - guess-the-material rounds, scoped per session
//!
//! Randomness is always injected by the caller so a seeded RNG gives
//! reproducible readings and rounds.

pub mod measure;
pub mod mystery;
pub mod sweep;

pub use measure::{measure, measure_at, Measurement, ThermalStatus, NOISE_FRACTION};
pub use mystery::{
    Acknowledgement, GuessOutcome, GuessVerdict, MysteryGame, MysterySessions, DEFAULT_SESSION,
    MAX_SESSIONS,
};
pub use sweep::{find_knee, linspace, sweep, sweep_with, KneePoint, SweepRange, SweepResult};
