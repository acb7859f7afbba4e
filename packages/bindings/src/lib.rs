use napi::Result as NapiResult;
use napi_derive::napi;

use tilgungsplan_core::amortization::schedule::{self, LoanParameters};
use tilgungsplan_core::charts::series;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_parameters(input_json: &str) -> NapiResult<LoanParameters> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tilgungsplan
// ---------------------------------------------------------------------------

/// Full schedule with summary, warnings and metadata.
#[napi]
pub fn tilgungsplan(input_json: String) -> NapiResult<String> {
    let params = parse_parameters(&input_json)?;
    let output = schedule::calculate_tilgungsplan(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

#[napi]
pub fn balance_series(input_json: String) -> NapiResult<String> {
    let params = parse_parameters(&input_json)?;
    let schedule = schedule::generate_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&series::balance_series(&schedule)).map_err(to_napi_error)
}

#[napi]
pub fn payment_split_series(input_json: String) -> NapiResult<String> {
    let params = parse_parameters(&input_json)?;
    let schedule = schedule::generate_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&series::payment_split_series(&schedule)).map_err(to_napi_error)
}
