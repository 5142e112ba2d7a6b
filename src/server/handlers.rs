//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::payload::{GuessBody, MeasureBody, SweepBody};
use super::{AppState, MAX_SESSION_ID_LEN, SESSION_HEADER};
use crate::error::{LabError, Result};
use crate::lab::{
    measure_at, sweep_with, Acknowledgement, GuessOutcome, Measurement, SweepRange, SweepResult,
    DEFAULT_SESSION,
};

/// Turn a body extraction failure into a structured input error.
fn rejected(rejection: JsonRejection) -> LabError {
    LabError::invalid_input("body", rejection.body_text())
}

fn session_id(headers: &HeaderMap) -> Result<String> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(DEFAULT_SESSION.to_string());
    };
    let id = value
        .to_str()
        .map_err(|_| LabError::invalid_input(SESSION_HEADER, "must be visible ASCII"))?
        .trim();
    if id.is_empty() {
        Ok(DEFAULT_SESSION.to_string())
    } else if id.len() > MAX_SESSION_ID_LEN {
        Err(LabError::invalid_input(
            SESSION_HEADER,
            format!("must be at most {MAX_SESSION_ID_LEN} bytes"),
        ))
    } else {
        Ok(id.to_string())
    }
}

pub(super) async fn measure(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MeasureBody>, JsonRejection>,
) -> Result<Json<Measurement>> {
    let Json(body) = payload.map_err(rejected)?;
    let params = body.parameters()?;
    let voltage = body.voltage()?;

    let reading = measure_at(&params, voltage, &mut *state.rng())?;
    Ok(Json(reading))
}

pub(super) async fn sweep(
    payload: std::result::Result<Json<SweepBody>, JsonRejection>,
) -> Result<Json<SweepResult>> {
    let Json(body) = payload.map_err(rejected)?;
    let params = body.parameters()?;
    let (start, end) = body.bounds()?;

    let curve = sweep_with(&params, SweepRange::new(start, end)?)?;
    Ok(Json(curve))
}

pub(super) async fn start_mystery(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Acknowledgement>> {
    let session = session_id(&headers)?;
    let ack = state.mysteries().start(&session, &mut *state.rng());
    Ok(Json(ack))
}

pub(super) async fn submit_guess(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<GuessBody>, JsonRejection>,
) -> Result<Json<GuessOutcome>> {
    let session = session_id(&headers)?;
    let Json(body) = payload.map_err(rejected)?;
    let guess = body.material()?;

    let outcome = state.mysteries().submit_guess(&session, guess)?;
    Ok(Json(outcome))
}
