//! WASM bindings for Diode Lab.
//!
//! Runs the bench entirely in the browser, no server round-trip. Every
//! method returns the same JSON the HTTP API would.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDiodeLab } from 'diode_lab';
//!
//! await init();
//!
//! const lab = new WasmDiodeLab(Date.now() >>> 0);
//! const curve = JSON.parse(lab.sweep('Ge', 27, -1, 1));
//! plot(curve.data, curve.saddle);
//!
//! lab.start_mystery();
//! const { result, actual } = JSON.parse(lab.submit_guess('Si'));
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::error::LabError;
use crate::lab::{self, MysteryGame, SweepRange};
use crate::physics::{DiodeParameters, Material};
use crate::DEFAULT_ZENER_VOLTAGE;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: LabError) -> JsValue {
    JsValue::from_str(&format!("{}: {}", err.kind(), err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js(e.into()))
}

/// In-browser diode bench with its own RNG and mystery round.
#[wasm_bindgen]
pub struct WasmDiodeLab {
    rng: StdRng,
    game: MysteryGame,
}

#[wasm_bindgen]
impl WasmDiodeLab {
    /// Create a bench whose noise and mystery picks derive from `seed`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WasmDiodeLab {
        WasmDiodeLab {
            rng: StdRng::seed_from_u64(u64::from(seed)),
            game: MysteryGame::new(),
        }
    }

    /// Noisy reading; returns `{voltage, current, power, status, saturation, breakdown}`.
    #[wasm_bindgen]
    pub fn measure(&mut self, material: &str, temp: f64, voltage: f64) -> Result<String, JsValue> {
        self.measure_zener(material, temp, voltage, DEFAULT_ZENER_VOLTAGE)
    }

    /// Like `measure`, with an explicit Zener breakdown magnitude.
    #[wasm_bindgen]
    pub fn measure_zener(
        &mut self,
        material: &str,
        temp: f64,
        voltage: f64,
        zener: f64,
    ) -> Result<String, JsValue> {
        let params = DiodeParameters::from_label(material, temp, zener).map_err(to_js)?;
        let reading = lab::measure_at(&params, voltage, &mut self.rng).map_err(to_js)?;
        to_json(&reading)
    }

    /// 300-point curve; returns `{data, saddle, saturation, breakdown}`.
    #[wasm_bindgen]
    pub fn sweep(&self, material: &str, temp: f64, start: f64, end: f64) -> Result<String, JsValue> {
        let params =
            DiodeParameters::from_label(material, temp, DEFAULT_ZENER_VOLTAGE).map_err(to_js)?;
        let range = SweepRange::new(start, end).map_err(to_js)?;
        let curve = lab::sweep_with(&params, range).map_err(to_js)?;
        to_json(&curve)
    }

    /// Hide a new random material.
    #[wasm_bindgen]
    pub fn start_mystery(&mut self) -> Result<String, JsValue> {
        let ack = self.game.start(&mut self.rng);
        to_json(&ack)
    }

    /// Returns `{result, actual}`, or throws if no round was started.
    #[wasm_bindgen]
    pub fn submit_guess(&self, guess: &str) -> Result<String, JsValue> {
        let guess: Material = guess.parse().map_err(to_js)?;
        let outcome = self.game.submit_guess(guess).map_err(to_js)?;
        to_json(&outcome)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Material labels accepted by the bench, in catalogue order.
#[wasm_bindgen]
pub fn materials() -> Vec<JsValue> {
    Material::ALL
        .iter()
        .map(|m| JsValue::from_str(m.label()))
        .collect()
}
