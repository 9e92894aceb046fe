use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

use crate::error::ApiError;

#[derive(Embed)]
#[folder = "web/"]
pub struct Assets;

pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = format!("static/{}", path.trim_start_matches('/'));

    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], content.data.into_owned()).into_response()
        }
        None => ApiError::NotFound.into_response(),
    }
}
