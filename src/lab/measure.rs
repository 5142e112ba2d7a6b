//! Single-point measurement.
//!
//! A reading evaluates the model, perturbs the current with uniform
//! multiplicative noise of +/-0.5 % to mimic a bench meter, and flags the
//! part as burnt when the dissipated power exceeds its rating.

use rand::Rng;
use serde::Serialize;

use crate::error::{ensure_finite, Result};
use crate::physics::{DiodeParameters, Material};

/// Half-width of the relative noise band applied to measured current.
pub const NOISE_FRACTION: f64 = 0.005;

/// Outcome of the power check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThermalStatus {
    #[serde(rename = "OPTIMAL")]
    Optimal,
    #[serde(rename = "BURNT (Overheat)")]
    Burnt,
}

impl ThermalStatus {
    /// `Optimal` when `|power| <= limit`, `Burnt` otherwise.
    pub fn classify(power: f64, limit: f64) -> Self {
        if power.abs() <= limit {
            ThermalStatus::Optimal
        } else {
            ThermalStatus::Burnt
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThermalStatus::Optimal => "OPTIMAL",
            ThermalStatus::Burnt => "BURNT (Overheat)",
        }
    }
}

/// A noisy reading at one bias voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub voltage: f64,
    /// Measured current including noise
    pub current: f64,
    pub power: f64,
    pub status: ThermalStatus,
    #[serde(rename = "saturation")]
    pub saturation_current: f64,
    #[serde(rename = "breakdown")]
    pub breakdown_voltage: f64,
}

/// Measure a diode at `voltage` using the default Zener rating.
pub fn measure<R: Rng + ?Sized>(
    material: Material,
    temperature_celsius: f64,
    voltage: f64,
    rng: &mut R,
) -> Result<Measurement> {
    let params = DiodeParameters::new(material, temperature_celsius)?;
    measure_at(&params, voltage, rng)
}

/// Measure with already-derived parameters.
pub fn measure_at<R: Rng + ?Sized>(
    params: &DiodeParameters,
    voltage: f64,
    rng: &mut R,
) -> Result<Measurement> {
    let voltage = ensure_finite("voltage", voltage)?;

    let ideal = params.current(voltage);
    let jitter = rng.gen_range(-NOISE_FRACTION..NOISE_FRACTION);
    let current = ideal * (1.0 + jitter);
    let power = voltage * current;
    let status = ThermalStatus::classify(power, params.material().power_limit());

    tracing::debug!(
        material = %params.material(),
        temperature = params.temperature_celsius(),
        voltage,
        current,
        power,
        status = status.as_str(),
        "measured"
    );

    Ok(Measurement {
        voltage,
        current,
        power,
        status,
        saturation_current: params.saturation_current(),
        breakdown_voltage: params.breakdown_voltage(),
    })
}
