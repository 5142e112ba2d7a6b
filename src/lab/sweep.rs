//! Voltage sweep and knee search.

use serde::Serialize;

use crate::error::{ensure_finite, LabError, Result};
use crate::physics::{serialize_millivolts, DiodeParameters, Material, Sample};
use crate::{DEFAULT_SWEEP_END, DEFAULT_SWEEP_START, SWEEP_POINTS};

/// Closed voltage interval to sweep, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    start: f64,
    end: f64,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_SWEEP_START,
            end: DEFAULT_SWEEP_END,
        }
    }
}

impl SweepRange {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        let start = ensure_finite("start", start)?;
        let end = ensure_finite("end", end)?;
        if start >= end {
            return Err(LabError::invalid_input(
                "range",
                format!("start ({start} V) must be below end ({end} V)"),
            ));
        }
        if !(end - start).is_finite() {
            return Err(LabError::invalid_input(
                "range",
                format!("span from {start} V to {end} V overflows"),
            ));
        }
        let ascending = linspace(start, end, SWEEP_POINTS)
            .windows(2)
            .all(|pair| pair[1] > pair[0]);
        if !ascending {
            return Err(LabError::invalid_input(
                "range",
                format!("{start} V to {end} V is too narrow for {SWEEP_POINTS} distinct points"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

/// The sample closest to the material's knee current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KneePoint {
    #[serde(skip)]
    pub index: usize,
    #[serde(rename = "v", serialize_with = "serialize_millivolts")]
    pub voltage: f64,
    #[serde(rename = "i")]
    pub current: f64,
}

/// A complete noiseless curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    /// Samples in ascending voltage order
    pub data: Vec<Sample>,
    #[serde(rename = "saddle")]
    pub knee: KneePoint,
    #[serde(rename = "saturation")]
    pub saturation_current: f64,
    #[serde(rename = "breakdown")]
    pub breakdown_voltage: f64,
}

/// `n` evenly spaced points from `start` to `end`, both included.
///
/// The last point is pinned to `end` so accumulated rounding never
/// leaves the interval.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|k| start + step * k as f64).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// Locate the sample whose current is closest to `threshold`.
///
/// Ties keep the earliest sample. Returns `None` for an empty curve.
pub fn find_knee(samples: &[Sample], threshold: f64) -> Option<KneePoint> {
    let mut best: Option<(usize, f64)> = None;
    for (index, sample) in samples.iter().enumerate() {
        let distance = (sample.current - threshold).abs();
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| KneePoint {
        index,
        voltage: samples[index].voltage,
        current: samples[index].current,
    })
}

/// Sweep a diode over `[start, end]` with the default Zener rating.
pub fn sweep(
    material: Material,
    temperature_celsius: f64,
    start: f64,
    end: f64,
) -> Result<SweepResult> {
    let params = DiodeParameters::new(material, temperature_celsius)?;
    sweep_with(&params, SweepRange::new(start, end)?)
}

/// Sweep with already-derived parameters.
pub fn sweep_with(params: &DiodeParameters, range: SweepRange) -> Result<SweepResult> {
    let data: Vec<Sample> = linspace(range.start(), range.end(), SWEEP_POINTS)
        .into_iter()
        .map(|v| params.sample(v))
        .collect();

    let threshold = params.material().knee_threshold();
    let knee = find_knee(&data, threshold)
        .ok_or_else(|| LabError::invalid_input("range", "sweep produced no samples"))?;

    tracing::debug!(
        material = %params.material(),
        start = range.start(),
        end = range.end(),
        knee_voltage = knee.voltage,
        threshold,
        "swept"
    );

    Ok(SweepResult {
        data,
        knee,
        saturation_current: params.saturation_current(),
        breakdown_voltage: params.breakdown_voltage(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn exhaustive_argmin(samples: &[Sample], threshold: f64) -> usize {
        let best = samples
            .iter()
            .map(|s| (s.current - threshold).abs())
            .fold(f64::INFINITY, f64::min);
        samples
            .iter()
            .position(|s| (s.current - threshold).abs() == best)
            .unwrap()
    }

    #[test]
    fn test_linspace_endpoints() {
        let points = linspace(-2.0, 1.5, 300);
        assert_eq!(points.len(), 300);
        assert_eq!(points[0], -2.0);
        assert_eq!(points[299], 1.5);
        assert_relative_eq!(points[1] - points[0], 3.5 / 299.0, max_relative = 1e-9);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
    }

    #[test]
    fn test_default_sweep_shape() {
        let range = SweepRange::default();
        let params = DiodeParameters::new(Material::Si, 27.0).unwrap();
        let result = sweep_with(&params, range).unwrap();

        assert_eq!(result.data.len(), SWEEP_POINTS);
        assert_eq!(result.data[0].voltage, -2.0);
        assert_eq!(result.data[SWEEP_POINTS - 1].voltage, 1.5);
        for pair in result.data.windows(2) {
            assert!(pair[1].voltage > pair[0].voltage);
        }
        for s in &result.data {
            assert_eq!(s.power, s.voltage * s.current);
        }
        assert_eq!(result.breakdown_voltage, -50.0);
    }

    #[test]
    fn test_narrow_range_stays_ascending() {
        let result = sweep(Material::Si, 27.0, 0.6, 0.65).unwrap();
        assert_eq!(result.data.len(), SWEEP_POINTS);
        for pair in result.data.windows(2) {
            assert!(pair[1].voltage > pair[0].voltage);
        }
    }

    #[test]
    fn test_knee_is_exhaustive_minimum() {
        for material in Material::ALL {
            let result = sweep(material, 27.0, -2.0, 4.0).unwrap();
            let threshold = material.knee_threshold();
            let expected = exhaustive_argmin(&result.data, threshold);
            assert_eq!(result.knee.index, expected, "{material}");
            assert_eq!(result.knee.current, result.data[expected].current);
        }
    }

    #[test]
    fn test_germanium_uses_lower_threshold() {
        let result = sweep(Material::Ge, 27.0, -1.0, 1.0).unwrap();
        assert_eq!(result.knee.index, exhaustive_argmin(&result.data, 0.0005));
        assert_ne!(result.knee.index, exhaustive_argmin(&result.data, 0.001));
        assert!((result.knee.current - 0.0005).abs() < (result.knee.current - 0.001).abs());
    }

    #[test]
    fn test_knee_ties_keep_first() {
        let flat = |voltage| Sample {
            voltage,
            current: 0.002,
            power: 0.0,
        };
        let samples = [flat(0.1), flat(0.2), flat(0.3)];
        assert_eq!(find_knee(&samples, 0.001).unwrap().index, 0);
        assert!(find_knee(&[], 0.001).is_none());
    }

    #[test]
    fn test_invalid_ranges() {
        let cases = [
            (1.0, 1.0),
            (1.5, -2.0),
            (f64::NAN, 1.0),
            (0.0, f64::INFINITY),
            (-1e308, 1e308),
            (1.0, 1.0 + 1e-14),
        ];
        for (start, end) in cases {
            let err = SweepRange::new(start, end).unwrap_err();
            assert!(matches!(err, LabError::InvalidInput { .. }), "{start}..{end}");
        }
    }

    #[test]
    fn test_overflowing_span_is_rejected() {
        let err = SweepRange::new(-1e308, 1e308).unwrap_err();
        assert!(matches!(err, LabError::InvalidInput { ref field, .. } if field == "range"));
        assert!(sweep(Material::Si, 27.0, -f64::MAX, f64::MAX).is_err());

        // wide but representable spans still start exactly at `start`
        let result = sweep(Material::Si, 27.0, -1e307, 1e307).unwrap();
        assert_eq!(result.data[0].voltage, -1e307);
        assert!(result.data.iter().all(|s| s.voltage.is_finite()));
    }

    #[test]
    fn test_range_without_distinct_points_is_rejected() {
        let err = SweepRange::new(1.0, 1.0 + 1e-14).unwrap_err();
        assert!(matches!(err, LabError::InvalidInput { ref field, .. } if field == "range"));

        // 1e-9 V still leaves room for 300 distinct doubles
        let result = sweep(Material::Si, 27.0, 1.0, 1.0 + 1e-9).unwrap();
        for pair in result.data.windows(2) {
            assert!(pair[1].voltage > pair[0].voltage);
        }
    }

    #[test]
    fn test_wire_format() {
        let result = sweep(Material::RedLed, 27.0, -6.0, 2.5).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), SWEEP_POINTS);
        assert_eq!(data[0]["v"], -6.0);
        assert!(json["saddle"].get("v").is_some());
        assert!(json["saddle"].get("index").is_none());
        assert_eq!(json["breakdown"], -5.0);
        assert_eq!(json["saturation"], 1e-18);
    }
}
