//! Diode parameter derivation and I-V evaluation.
//!
//! Parameters are derived once per request from (material, temperature,
//! Zener rating) and never mutated afterwards; evaluation is a pure function
//! of those scalars and the applied voltage.

use serde::Serialize;

use super::{serialize_millivolts, Material, EXPONENT_LIMIT};
use crate::error::{ensure_finite, LabError, Result};
use crate::{BOLTZMANN_CONSTANT, DEFAULT_ZENER_VOLTAGE, ELEMENTARY_CHARGE, REFERENCE_TEMPERATURE_C};

/// Offset between the Celsius and Kelvin scales.
const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Derived model parameters for one diode at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeParameters {
    material: Material,
    temperature_celsius: f64,
    zener_voltage: f64,
    temperature_kelvin: f64,
    /// kT/q in volts
    thermal_voltage: f64,
    saturation_current: f64,
    emission_coefficient: f64,
    /// Negative; reverse voltages below this are in breakdown
    breakdown_voltage: f64,
    breakdown_slope: f64,
}

impl DiodeParameters {
    /// Derive parameters using the default 5.1 V Zener rating.
    pub fn new(material: Material, temperature_celsius: f64) -> Result<Self> {
        Self::with_zener_voltage(material, temperature_celsius, DEFAULT_ZENER_VOLTAGE)
    }

    /// Derive parameters with an explicit Zener breakdown rating (volts, positive).
    ///
    /// The rating is ignored by every material except [`Material::Zener`].
    pub fn with_zener_voltage(
        material: Material,
        temperature_celsius: f64,
        zener_voltage: f64,
    ) -> Result<Self> {
        let temperature_celsius = ensure_finite("temp", temperature_celsius)?;
        let temperature_kelvin = temperature_celsius + CELSIUS_TO_KELVIN;
        if temperature_kelvin <= 0.0 {
            return Err(LabError::invalid_input(
                "temp",
                format!("{temperature_celsius} C is at or below absolute zero"),
            ));
        }

        let zener_voltage = ensure_finite("zener", zener_voltage)?;
        if zener_voltage <= 0.0 {
            return Err(LabError::invalid_input(
                "zener",
                "Zener voltage must be a positive magnitude",
            ));
        }

        let saturation_current = if material.is_temperature_scaled() {
            let scale = 2f64.powf((temperature_celsius - REFERENCE_TEMPERATURE_C) / 10.0);
            material.base_saturation_current() * scale
        } else {
            material.base_saturation_current()
        };

        Ok(Self {
            material,
            temperature_celsius,
            zener_voltage,
            temperature_kelvin,
            thermal_voltage: BOLTZMANN_CONSTANT * temperature_kelvin / ELEMENTARY_CHARGE,
            saturation_current,
            emission_coefficient: material.emission_coefficient(),
            breakdown_voltage: material.breakdown_voltage(zener_voltage),
            breakdown_slope: material.breakdown_slope(),
        })
    }

    /// Parse a material label and derive parameters for it.
    pub fn from_label(label: &str, temperature_celsius: f64, zener_voltage: f64) -> Result<Self> {
        let material = label.parse()?;
        Self::with_zener_voltage(material, temperature_celsius, zener_voltage)
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn zener_voltage(&self) -> f64 {
        self.zener_voltage
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature_kelvin
    }

    pub fn thermal_voltage(&self) -> f64 {
        self.thermal_voltage
    }

    pub fn saturation_current(&self) -> f64 {
        self.saturation_current
    }

    pub fn emission_coefficient(&self) -> f64 {
        self.emission_coefficient
    }

    pub fn breakdown_voltage(&self) -> f64 {
        self.breakdown_voltage
    }

    pub fn breakdown_slope(&self) -> f64 {
        self.breakdown_slope
    }

    /// Clamped Shockley exponent V / (n * Vt).
    pub fn exponent(&self, voltage: f64) -> f64 {
        (voltage / (self.emission_coefficient * self.thermal_voltage))
            .clamp(-EXPONENT_LIMIT, EXPONENT_LIMIT)
    }

    /// Shockley branch: Is * (exp(x) - 1).
    pub fn shockley_current(&self, voltage: f64) -> f64 {
        self.saturation_current * (self.exponent(voltage).exp() - 1.0)
    }

    /// Linear breakdown branch: -slope * (|V| - |Vbr|).
    pub fn breakdown_current(&self, voltage: f64) -> f64 {
        -self.breakdown_slope * (voltage.abs() - self.breakdown_voltage.abs())
    }

    /// Whether `voltage` lies past the reverse breakdown point.
    pub fn in_breakdown(&self, voltage: f64) -> bool {
        voltage < self.breakdown_voltage
    }

    /// Diode current at `voltage`.
    ///
    /// The slope is discontinuous at the breakdown point; the value is not
    /// (both branches are ~0 there).
    pub fn current(&self, voltage: f64) -> f64 {
        if self.in_breakdown(voltage) {
            self.breakdown_current(voltage)
        } else {
            self.shockley_current(voltage)
        }
    }

    /// Evaluate the current for every voltage, preserving order and length.
    pub fn currents(&self, voltages: &[f64]) -> Vec<f64> {
        voltages.iter().map(|&v| self.current(v)).collect()
    }

    /// Evaluate one noiseless sample.
    pub fn sample(&self, voltage: f64) -> Sample {
        let current = self.current(voltage);
        Sample {
            voltage,
            current,
            power: voltage * current,
        }
    }
}

/// One point on the I-V curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Volts (rounded to millivolts only when serialized)
    #[serde(rename = "v", serialize_with = "serialize_millivolts")]
    pub voltage: f64,
    /// Amperes
    #[serde(rename = "i")]
    pub current: f64,
    /// Watts, `voltage * current`
    #[serde(rename = "p")]
    pub power: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn params(material: Material) -> DiodeParameters {
        DiodeParameters::new(material, REFERENCE_TEMPERATURE_C).unwrap()
    }

    #[test]
    fn test_thermal_voltage_at_room_temperature() {
        let p = params(Material::Si);
        assert_relative_eq!(p.temperature_kelvin(), 300.15, max_relative = 1e-12);
        assert_abs_diff_eq!(p.thermal_voltage(), 0.02585, epsilon = 5e-5);
    }

    #[test]
    fn test_saturation_current_doubles_every_ten_degrees() {
        for material in [Material::Si, Material::Ge, Material::Zener] {
            let cold = DiodeParameters::new(material, 27.0).unwrap();
            let warm = DiodeParameters::new(material, 37.0).unwrap();
            assert_relative_eq!(
                warm.saturation_current(),
                2.0 * cold.saturation_current(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_led_saturation_current_is_fixed() {
        for material in [Material::RedLed, Material::BlueLed] {
            let cold = DiodeParameters::new(material, -10.0).unwrap();
            let hot = DiodeParameters::new(material, 85.0).unwrap();
            assert_eq!(cold.saturation_current(), hot.saturation_current());
        }
        assert_eq!(params(Material::BlueLed).saturation_current(), 1e-24);
    }

    #[test]
    fn test_derivation_is_reproducible() {
        for material in Material::ALL {
            let a = DiodeParameters::new(material, 42.5).unwrap();
            let b = DiodeParameters::new(material, 42.5).unwrap();
            assert_eq!(a.saturation_current(), b.saturation_current());
            assert_eq!(a.emission_coefficient(), b.emission_coefficient());
            assert_eq!(a.breakdown_voltage(), b.breakdown_voltage());
        }
    }

    #[test]
    fn test_from_label_rejects_unknown_material() {
        let err = DiodeParameters::from_label("GaN", 27.0, 5.1).unwrap_err();
        assert!(matches!(err, LabError::InvalidMaterial { .. }));
    }

    #[test]
    fn test_rejects_bad_temperature_and_rating() {
        assert!(matches!(
            DiodeParameters::new(Material::Si, -300.0),
            Err(LabError::InvalidInput { .. })
        ));
        assert!(DiodeParameters::new(Material::Si, f64::NAN).is_err());
        assert!(DiodeParameters::with_zener_voltage(Material::Zener, 27.0, 0.0).is_err());
        assert!(DiodeParameters::with_zener_voltage(Material::Zener, 27.0, -5.1).is_err());
    }

    #[test]
    fn test_silicon_forward_point() {
        let p = params(Material::Si);
        let x = p.exponent(0.7);
        assert_abs_diff_eq!(x, 0.7 / (1.5 * p.thermal_voltage()), epsilon = 1e-12);
        assert_abs_diff_eq!(x, 18.05, epsilon = 0.05);

        let i = p.current(0.7);
        assert!(i > 6.5e-5 && i < 7.2e-5, "I(0.7) = {i}");
    }

    #[test]
    fn test_breakdown_branch_below_breakdown() {
        for material in Material::ALL {
            let p = params(material);
            let vbr = p.breakdown_voltage();
            for extra in [1e-3, 0.1, 1.0, 7.5] {
                let v = vbr - extra;
                assert!(p.in_breakdown(v));
                let expected = -p.breakdown_slope() * (v.abs() - vbr.abs());
                assert_relative_eq!(p.current(v), expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_breakdown_is_continuous_in_value() {
        for material in Material::ALL {
            let p = params(material);
            let vbr = p.breakdown_voltage();
            let just_below = p.current(vbr - 1e-9);
            let at = p.current(vbr);
            assert_abs_diff_eq!(just_below, at, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zener_breakdown_scenario() {
        let p = params(Material::Zener);
        assert_relative_eq!(p.current(-6.0), -0.45, max_relative = 1e-9);
    }

    #[test]
    fn test_forward_region_is_monotonic() {
        for material in Material::ALL {
            let p = params(material);
            let mut last = p.current(0.0);
            for step in 1..=400 {
                let v = step as f64 * 0.01;
                let i = p.current(v);
                assert!(i >= last, "{material}: I({v}) = {i} < {last}");
                last = i;
            }
        }
    }

    #[test]
    fn test_exponent_is_clamped() {
        let p = params(Material::Ge);
        assert_eq!(p.exponent(100.0), EXPONENT_LIMIT);
        assert_eq!(p.exponent(-10.0), -EXPONENT_LIMIT);
        assert!(p.current(100.0).is_finite());
    }

    #[test]
    fn test_currents_matches_scalar_evaluation() {
        let p = params(Material::RedLed);
        let voltages = [-6.0, -5.0, -1.0, 0.0, 1.5, 1.8, 2.2];
        let currents = p.currents(&voltages);
        assert_eq!(currents.len(), voltages.len());
        for (v, i) in voltages.iter().zip(&currents) {
            assert_eq!(*i, p.current(*v));
        }
        assert!(p.currents(&[]).is_empty());
    }

    #[test]
    fn test_sample_serializes_rounded_voltage() {
        let p = params(Material::Si);
        let sample = p.sample(0.123456);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["v"], 0.123);
        assert_eq!(json["i"], sample.current);
        assert_eq!(json["p"], sample.power);
    }
}
