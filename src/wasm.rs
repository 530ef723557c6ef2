//! WASM bindings for the frame solver
//!
//! Runs the analysis directly in the browser, with the same JSON request and
//! response shapes as the HTTP service.

use wasm_bindgen::prelude::*;

use crate::analysis::AnalysisOptions;
use crate::api;

// Use wee_alloc for smaller WASM binary
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Analyze a frame model.
///
/// Takes a JSON analysis request (`model`, optional `options`,
/// `include_matrices`) and returns the JSON response envelope.
#[wasm_bindgen]
pub fn analyze(request_json: &str) -> String {
    let start = js_sys::Date::now();
    let response = api::analyze_json(request_json, &AnalysisOptions::default());

    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "frame-solver: analysis took {} ms",
        js_sys::Date::now() - start
    )));
    response
}

/// Assemble `K`, `F`, `K'`, `F'` without solving
#[wasm_bindgen]
pub fn assemble(request_json: &str) -> String {
    api::assemble_json(request_json)
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
