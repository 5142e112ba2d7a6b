//! Diode physics.
//!
//! The device model is the Shockley equation extended with a linear
//! reverse-breakdown region:
//!
//! ```text
//! I(V) = Is * (exp(clip(V / (n * Vt), -50, 50)) - 1)     for V >= Vbr
//! I(V) = -slope * (|V| - |Vbr|)                           for V <  Vbr
//! ```
//!
//! where `Vt = k * T / q` is the thermal voltage. Material constants live in
//! [`Material`]; [`DiodeParameters`] derives the per-temperature scalars and
//! evaluates the curve.
//!
//! # Materials
//!
//! | Material | Is (A) | n | Vbr (V) | slope |
//! |----------|--------|---|---------|-------|
//! | Si | 1e-12 x scale | 1.5 | -50 | 10 |
//! | Ge | 1e-6 x scale | 1.0 | -20 | 10 |
//! | RedLED | 1e-18 | 2.0 | -5 | 10 |
//! | BlueLED | 1e-24 | 3.5 | -5 | 10 |
//! | Zener | 1e-12 x scale | 1.5 | -Vz | 0.5 |
//!
//! `scale = 2^((T - 27) / 10)`, i.e. leakage doubles every 10 degrees C.

mod diode;
mod material;

pub use diode::{DiodeParameters, Sample};
pub use material::Material;

use serde::Serializer;

/// Exponent clamp applied before `exp()` to keep the Shockley branch finite.
pub const EXPONENT_LIMIT: f64 = 50.0;

/// Round a voltage to millivolt resolution for the wire format.
pub(crate) fn round_millivolts(voltage: f64) -> f64 {
    (voltage * 1000.0).round() / 1000.0
}

pub(crate) fn serialize_millivolts<S: Serializer>(
    voltage: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_millivolts(*voltage))
}
