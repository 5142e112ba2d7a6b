//! # Diode Lab
//!
//! A virtual bench for exploring diode current-voltage characteristics.
//!
//! This library provides:
//! - A Shockley diode model with a linear reverse-breakdown region for
//!   silicon, germanium, red/blue LED and Zener parts
//! - Noisy single-point measurements with an overheat check
//! - 300-point voltage sweeps with knee detection
//! - A guess-the-material game scoped per session
//! - A JSON-over-HTTP server and CLI (feature `cli`) and browser bindings
//!   (feature `wasm`)
//!
//! ## Architecture
//!
//! - [`physics`] - material constants, parameter derivation, I-V evaluation
//! - [`lab`] - measurement, sweep and mystery services
//! - [`server`] - HTTP endpoints (CLI only)
//! - [`config`] / [`logging`] - server and tracing setup (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! diode-lab serve --bind 127.0.0.1:5000
//! diode-lab measure --material Si --temp 27 --voltage 0.7
//! diode-lab sweep --material Ge --start -1 --end 1 --csv
//! ```
//!
//! ### Library
//!
//! ```rust
//! use diode_lab::lab;
//! use diode_lab::physics::Material;
//!
//! let curve = lab::sweep(Material::Ge, 27.0, -1.0, 1.0).unwrap();
//! assert_eq!(curve.data.len(), diode_lab::SWEEP_POINTS);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmDiodeLab } from 'diode_lab';
//!
//! const lab = new WasmDiodeLab(1234);
//! const reading = JSON.parse(lab.measure('Si', 27, 0.7));
//! ```

pub mod error;
pub mod lab;
pub mod physics;

#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "cli")]
pub mod server;

// Re-export main types for convenience
pub use error::{LabError, Result};
pub use physics::{DiodeParameters, Material};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDiodeLab;

/// Boltzmann constant in J/K
pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

/// Elementary charge in C
pub const ELEMENTARY_CHARGE: f64 = 1.60217663e-19;

/// Temperature at which the base saturation currents are specified, in degrees C
pub const REFERENCE_TEMPERATURE_C: f64 = 27.0;

/// Default Zener breakdown magnitude in volts
pub const DEFAULT_ZENER_VOLTAGE: f64 = 5.1;

/// Number of points in every sweep
pub const SWEEP_POINTS: usize = 300;

/// Default sweep window in volts
pub const DEFAULT_SWEEP_START: f64 = -2.0;
pub const DEFAULT_SWEEP_END: f64 = 1.5;
