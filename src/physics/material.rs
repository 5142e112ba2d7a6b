//! Diode materials and their fixed constants.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{LabError, Result};

/// The diode types available on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Material {
    /// Silicon rectifier
    Si,
    /// Germanium point-contact diode (low knee)
    Ge,
    /// Red light-emitting diode
    #[serde(rename = "RedLED")]
    RedLed,
    /// Blue light-emitting diode (highest forward drop)
    #[serde(rename = "BlueLED")]
    BlueLed,
    /// Zener diode with a soft, adjustable breakdown
    Zener,
}

impl Material {
    /// Every material, in catalogue order.
    pub const ALL: [Material; 5] = [
        Material::Si,
        Material::Ge,
        Material::RedLed,
        Material::BlueLed,
        Material::Zener,
    ];

    /// Label used on the wire and on the command line.
    pub fn label(self) -> &'static str {
        match self {
            Material::Si => "Si",
            Material::Ge => "Ge",
            Material::RedLed => "RedLED",
            Material::BlueLed => "BlueLED",
            Material::Zener => "Zener",
        }
    }

    /// Saturation current at 27 degrees C, in amperes.
    pub fn base_saturation_current(self) -> f64 {
        match self {
            Material::Si => 1e-12,
            Material::Ge => 1e-6,
            Material::RedLed => 1e-18,
            Material::BlueLed => 1e-24,
            Material::Zener => 1e-12,
        }
    }

    /// Whether the saturation current doubles every 10 degrees C.
    /// LED leakage is treated as temperature independent.
    pub fn is_temperature_scaled(self) -> bool {
        matches!(self, Material::Si | Material::Ge | Material::Zener)
    }

    /// Emission (ideality) coefficient n.
    pub fn emission_coefficient(self) -> f64 {
        match self {
            Material::Si | Material::Zener => 1.5,
            Material::Ge => 1.0,
            Material::RedLed => 2.0,
            Material::BlueLed => 3.5,
        }
    }

    /// Reverse breakdown voltage (negative). Only the Zener honours
    /// `zener_voltage`; the others have a fixed rating.
    pub fn breakdown_voltage(self, zener_voltage: f64) -> f64 {
        match self {
            Material::Si => -50.0,
            Material::Ge => -20.0,
            Material::RedLed | Material::BlueLed => -5.0,
            Material::Zener => -zener_voltage,
        }
    }

    /// Slope of the linear breakdown region, in amperes per volt.
    pub fn breakdown_slope(self) -> f64 {
        match self {
            Material::Zener => 0.5,
            _ => 10.0,
        }
    }

    pub fn is_led(self) -> bool {
        matches!(self, Material::RedLed | Material::BlueLed)
    }

    /// Maximum dissipation before the part is reported as burnt, in watts.
    pub fn power_limit(self) -> f64 {
        if self.is_led() {
            0.05
        } else {
            0.5
        }
    }

    /// Forward current marking the knee of the curve, in amperes.
    pub fn knee_threshold(self) -> f64 {
        match self {
            Material::Ge => 0.0005,
            _ => 0.001,
        }
    }
}

impl FromStr for Material {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        Material::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| LabError::invalid_material(s))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
