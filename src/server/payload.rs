//! Request bodies.
//!
//! Numeric fields accept either JSON numbers or numeric strings, so a form
//! that posts `"27"` behaves the same as one that posts `27`.

use serde::Deserialize;

use crate::error::{ensure_finite, LabError, Result};
use crate::physics::{DiodeParameters, Material};
use crate::{DEFAULT_SWEEP_END, DEFAULT_SWEEP_START, DEFAULT_ZENER_VOLTAGE, REFERENCE_TEMPERATURE_C};

/// A number, possibly sent as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn value(&self, field: &str) -> Result<f64> {
        let value = match self {
            Numeric::Number(v) => *v,
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| LabError::invalid_input(field, format!("'{s}' is not a number")))?,
        };
        ensure_finite(field, value)
    }
}

/// Resolve an optional numeric field, falling back to `default` when absent.
pub fn numeric_or(value: Option<&Numeric>, field: &str, default: f64) -> Result<f64> {
    value.map_or(Ok(default), |v| v.value(field))
}

/// Resolve an optional material label; absent means silicon.
pub fn material_or_default(label: Option<&str>) -> Result<Material> {
    label.map_or(Ok(Material::Si), |l| l.parse())
}

fn derive_parameters(
    material: Option<&str>,
    temp: Option<&Numeric>,
    zener: Option<&Numeric>,
) -> Result<DiodeParameters> {
    DiodeParameters::with_zener_voltage(
        material_or_default(material)?,
        numeric_or(temp, "temp", REFERENCE_TEMPERATURE_C)?,
        numeric_or(zener, "zener", DEFAULT_ZENER_VOLTAGE)?,
    )
}

/// Body of `POST /api/measure`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasureBody {
    pub material: Option<String>,
    pub temp: Option<Numeric>,
    pub voltage: Option<Numeric>,
    pub zener: Option<Numeric>,
}

impl MeasureBody {
    pub fn parameters(&self) -> Result<DiodeParameters> {
        derive_parameters(self.material.as_deref(), self.temp.as_ref(), self.zener.as_ref())
    }

    pub fn voltage(&self) -> Result<f64> {
        numeric_or(self.voltage.as_ref(), "voltage", 0.0)
    }
}

/// Body of `POST /api/sweep`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepBody {
    pub material: Option<String>,
    pub start: Option<Numeric>,
    pub end: Option<Numeric>,
    pub temp: Option<Numeric>,
    pub zener: Option<Numeric>,
}

impl SweepBody {
    pub fn parameters(&self) -> Result<DiodeParameters> {
        derive_parameters(self.material.as_deref(), self.temp.as_ref(), self.zener.as_ref())
    }

    pub fn bounds(&self) -> Result<(f64, f64)> {
        Ok((
            numeric_or(self.start.as_ref(), "start", DEFAULT_SWEEP_START)?,
            numeric_or(self.end.as_ref(), "end", DEFAULT_SWEEP_END)?,
        ))
    }
}

/// Body of `POST /api/submit_guess`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuessBody {
    pub guess: Option<String>,
}

impl GuessBody {
    pub fn material(&self) -> Result<Material> {
        self.guess
            .as_deref()
            .ok_or_else(|| LabError::invalid_input("guess", "missing material label"))?
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accepts_numbers_and_strings() {
        let body: MeasureBody =
            serde_json::from_str(r#"{"temp": 35, "voltage": " 0.65 "}"#).unwrap();
        assert_eq!(body.voltage().unwrap(), 0.65);
        assert_eq!(body.parameters().unwrap().temperature_celsius(), 35.0);
    }

    #[test]
    fn test_defaults() {
        let body: MeasureBody = serde_json::from_str("{}").unwrap();
        let params = body.parameters().unwrap();
        assert_eq!(params.material(), Material::Si);
        assert_eq!(params.temperature_celsius(), REFERENCE_TEMPERATURE_C);
        assert_eq!(body.voltage().unwrap(), 0.0);

        let sweep: SweepBody = serde_json::from_str(r#"{"material": null}"#).unwrap();
        assert_eq!(sweep.bounds().unwrap(), (DEFAULT_SWEEP_START, DEFAULT_SWEEP_END));
    }

    #[test]
    fn test_non_numeric_text_names_field() {
        let body: MeasureBody = serde_json::from_str(r#"{"temp": "warm"}"#).unwrap();
        match body.parameters().unwrap_err() {
            LabError::InvalidInput { field, .. } => assert_eq!(field, "temp"),
            other => panic!("unexpected error: {other}"),
        }

        let body: MeasureBody = serde_json::from_str(r#"{"voltage": "nan"}"#).unwrap();
        assert!(body.voltage().is_err());
    }

    #[test]
    fn test_boolean_is_not_a_number() {
        assert!(serde_json::from_str::<MeasureBody>(r#"{"voltage": true}"#).is_err());
    }

    #[test]
    fn test_guess_parsing() {
        let body: GuessBody = serde_json::from_str(r#"{"guess": "BlueLED"}"#).unwrap();
        assert_eq!(body.material().unwrap(), Material::BlueLed);

        let missing = GuessBody::default();
        assert!(matches!(missing.material(), Err(LabError::InvalidInput { .. })));

        let unknown = GuessBody {
            guess: Some("Copper".to_string()),
        };
        assert!(matches!(unknown.material(), Err(LabError::InvalidMaterial { .. })));
    }
}
