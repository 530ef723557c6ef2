//! Request and response types shared by the HTTP server and the WASM
//! bindings

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisOptions};
use crate::error::{FrameError, FrameResult};
use crate::model::FrameModel;
use crate::results::{AnalysisReport, SystemMatrices};

/// Body of `POST /api/v1/analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub model: FrameModel,
    /// Falls back to the service defaults when absent
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
    /// Also return `K`, `F`, `K'`, `F'`
    #[serde(default)]
    pub include_matrices: bool,
}

/// Body of `POST /api/v1/assemble`
#[derive(Debug, Clone, Deserialize)]
pub struct AssembleRequest {
    pub model: FrameModel,
}

/// Uniform response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Error class from [`FrameError::kind`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn from_result(result: FrameResult<T>) -> Self {
        match result {
            Ok(results) => Self {
                success: true,
                kind: None,
                error: None,
                results: Some(results),
            },
            Err(e) => Self {
                success: false,
                kind: Some(e.kind().to_string()),
                error: Some(e.to_string()),
                results: None,
            },
        }
    }
}

/// Analyse a request, falling back to `defaults` for missing options
pub fn analyze(request: &AnalysisRequest, defaults: &AnalysisOptions) -> FrameResult<AnalysisReport> {
    let options = request.options.as_ref().unwrap_or(defaults);
    analysis::analyze_to_report(&request.model, options, request.include_matrices)
}

/// Labelled `K`, `F`, `K'`, `F'` of the requested model, without solving
pub fn assemble(request: &AssembleRequest) -> FrameResult<SystemMatrices> {
    analysis::system_matrices(&request.model)
}

/// Parse a raw analysis request body and analyse it.
///
/// Malformed bodies come back as a `serialization` envelope like any other
/// failure.
pub fn analyze_body(body: &[u8], defaults: &AnalysisOptions) -> ApiResponse<AnalysisReport> {
    let result = serde_json::from_slice::<AnalysisRequest>(body)
        .map_err(FrameError::from)
        .and_then(|request| analyze(&request, defaults));
    ApiResponse::from_result(result)
}

/// Parse a raw assemble request body and assemble it
pub fn assemble_body(body: &[u8]) -> ApiResponse<SystemMatrices> {
    let result = serde_json::from_slice::<AssembleRequest>(body)
        .map_err(FrameError::from)
        .and_then(|request| assemble(&request));
    ApiResponse::from_result(result)
}

/// Parse a JSON analysis request and return the JSON response envelope
pub fn analyze_json(request_json: &str, defaults: &AnalysisOptions) -> String {
    to_json(analyze_body(request_json.as_bytes(), defaults))
}

/// Parse a JSON assemble request and return the JSON response envelope
pub fn assemble_json(request_json: &str) -> String {
    to_json(assemble_body(request_json.as_bytes()))
}

fn to_json<T: Serialize>(response: ApiResponse<T>) -> String {
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"kind":"serialization","error":"Serialization failed: {}"}}"#,
            e
        )
    })
}
