//! Permissive CORS: any origin, `GET`/`POST`/`OPTIONS`, `content-type`.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub async fn cors(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return preflight();
    }
    let mut res = next.run(req).await;
    apply_cors_headers(res.headers_mut());
    res
}

/// Answer to a preflight request; never reaches the handlers.
pub fn preflight() -> Response {
    let mut res = StatusCode::NO_CONTENT.into_response();
    apply_cors_headers(res.headers_mut());
    res
}

pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
}
