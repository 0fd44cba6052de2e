use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tiny_http::{Request, Response};

use lora_tagger::TransformOutcome;

use crate::error::ApiError;
use crate::routes::{error_response, json_response};
use crate::state::ServerState;
use crate::util::paths::resolve_image_in;

const MAX_BODY_BYTES: usize = 64 * 1024; // 64 KB

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadBody {
    pub folder_path: String,
    pub image_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownscaleBody {
    pub folder_path: String,
    pub image_name: String,
    pub target_size: u32,
}

// ---------------------------------------------------------------------------
// POST /api/pad-to-square
// ---------------------------------------------------------------------------

pub fn handle_pad(request: &mut Request, state: &ServerState) -> Response<Cursor<Vec<u8>>> {
    respond(read_json::<PadBody>(request).and_then(|body| pad(&body, state)))
}

pub fn pad(body: &PadBody, state: &ServerState) -> Result<TransformOutcome, ApiError> {
    let path = resolve_image_in(&body.folder_path, &body.image_name)?;
    Ok(state.transformer.pad_to_square(&path)?)
}

// ---------------------------------------------------------------------------
// POST /api/downscale
// ---------------------------------------------------------------------------

pub fn handle_downscale(request: &mut Request, state: &ServerState) -> Response<Cursor<Vec<u8>>> {
    respond(read_json::<DownscaleBody>(request).and_then(|body| downscale(&body, state)))
}

pub fn downscale(body: &DownscaleBody, state: &ServerState) -> Result<TransformOutcome, ApiError> {
    let path = resolve_image_in(&body.folder_path, &body.image_name)?;
    Ok(state.transformer.downscale_to_target(&path, body.target_size)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn respond(result: Result<TransformOutcome, ApiError>) -> Response<Cursor<Vec<u8>>> {
    match result {
        Ok(outcome) => json_response(200, &outcome),
        Err(e) => error_response(&e),
    }
}

fn read_json<T: DeserializeOwned>(request: &mut Request) -> Result<T, ApiError> {
    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;
    parse_body(&body)
}

pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(ApiError::BodyTooLarge(MAX_BODY_BYTES));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}
