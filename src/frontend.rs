//! 嵌入式上传表单与静态资源服务。

use axum::body::Body as AxumBody;
use axum::http::{HeaderMap, HeaderValue, Request, header};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

use crate::error::ApiError;

#[derive(RustEmbed)]
#[folder = "public"]
/// 嵌入式静态资源。
pub struct PublicAssets;

const INDEX: &str = "index.html";

/// 上传表单首页。
pub async fn serve_index() -> Result<Response, ApiError> {
    load_embedded_asset(INDEX)?
        .ok_or_else(|| ApiError::Internal(format!("embedded {INDEX} missing")))
}

/// 其余路径按静态资源查找。
pub async fn serve_static(req: Request<AxumBody>) -> Result<Response, ApiError> {
    let path = req.uri().path().trim_start_matches('/');
    let requested = if path.is_empty() { INDEX } else { path };
    load_embedded_asset(requested)?.ok_or_else(|| ApiError::NotFound("Page not found.".into()))
}

/// 加载指定路径的嵌入式资源。
fn load_embedded_asset(path: &str) -> Result<Option<Response>, ApiError> {
    let Some(asset) = PublicAssets::get(path) else {
        return Ok(None);
    };
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.essence_str())
            .map_err(|_| ApiError::Internal(format!("invalid mime type for {path}")))?,
    );
    Ok(Some(
        (headers, AxumBody::from(asset.data.into_owned())).into_response(),
    ))
}
