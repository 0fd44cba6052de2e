use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::error::ApiError;
use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(field: &str, value: &str) -> Option<Header> {
    Header::from_bytes(field.as_bytes(), value.as_bytes()).ok()
}

fn response(status: u16, content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    let headers = [
        header("Content-Type", content_type),
        header("Access-Control-Allow-Origin", "*"),
    ];
    Response::new(
        StatusCode(status),
        headers.into_iter().flatten().collect(),
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn json_response<T: serde::Serialize>(status: u16, value: &T) -> Response<Cursor<Vec<u8>>> {
    match serde_json::to_vec(value) {
        Ok(body) => response(status, "application/json", body),
        Err(e) => {
            log::error!("failed to serialize response: {}", e);
            response(500, "application/json", br#"{"error":"Failed to serialize response."}"#.to_vec())
        }
    }
}

pub fn error_response(err: &ApiError) -> Response<Cursor<Vec<u8>>> {
    let status = err.status();
    if status >= 500 {
        log::error!("{}", err);
    } else {
        log::warn!("{}", err);
    }
    json_response(status, &serde_json::json!({ "error": err.to_string() }))
}

pub fn bytes_response(content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    response(200, content_type, body)
}

pub fn text_response(body: &str) -> Response<Cursor<Vec<u8>>> {
    response(200, "text/plain; charset=utf-8", body.as_bytes().to_vec())
}

pub fn preflight() -> Response<Cursor<Vec<u8>>> {
    let headers = [
        header("Access-Control-Allow-Origin", "*"),
        header("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
        header("Access-Control-Allow-Headers", "Content-Type"),
    ];
    Response::new(StatusCode(204), headers.into_iter().flatten().collect(), Cursor::new(Vec::new()), Some(0), None)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    json_response(404, &serde_json::json!({ "error": "Not Found" }))
}

const BANNER: &str = "lora-tagger studio\n\n\
    POST /api/pad-to-square  {folderPath, imageName}\n\
    POST /api/downscale      {folderPath, imageName, targetSize}\n\
    GET  /api/image?folderPath=..&imageName=..\n";

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains ownership
/// and always calls `request.respond(response)` itself.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = match url.find('?') {
        Some(pos) => (url[..pos].to_owned(), url[pos + 1..].to_owned()),
        None      => (url.clone(), String::new()),
    };

    log::debug!("{} {}", method, path);

    let response = match (method, path.as_str()) {
        (Method::Get,  "/")                  => text_response(BANNER),
        (Method::Options, _)                 => preflight(),

        (Method::Get,  "/api/image")         => handlers::files::handle_get(&query),
        (Method::Post, "/api/pad-to-square") => handlers::transform::handle_pad(&mut request, &state),
        (Method::Post, "/api/downscale")     => handlers::transform::handle_downscale(&mut request, &state),

        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response for {}: {}", url, e);
    }
}
