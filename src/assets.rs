use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

use crate::view;

#[derive(Embed)]
#[folder = "public/"]
pub struct Assets;

pub async fn serve_static(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            Response::builder()
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(content.data.into_owned()))
                .unwrap()
        }
        None => (StatusCode::NOT_FOUND, Html(view::not_found_page())).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        let asset = Assets::get("stylesheets/style.css").unwrap();
        let css = std::str::from_utf8(asset.data.as_ref()).unwrap();
        assert!(css.contains(".alert"));
    }
}
