//! Web app manifest route handler.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// The fixed manifest descriptor.
#[must_use]
pub fn manifest() -> Value {
    json!({
        "name": "智能错题本",
        "short_name": "错题本",
        "description": "AI 驱动的智能错题管理工具，帮助学生记录、分析和复习错题",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#2563eb",
        "orientation": "portrait",
        "icons": [
            {
                "src": "/icons/icon-512x512.png",
                "sizes": "512x512",
                "type": "image/png"
            }
        ]
    })
}

/// Serve the web app manifest.
pub async fn webmanifest() -> Response {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest().to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_fields() {
        let m = manifest();
        assert_eq!(m["short_name"], "错题本");
        assert_eq!(m["start_url"], "/");
        assert_eq!(m["display"], "standalone");
        assert_eq!(m["orientation"], "portrait");
        assert_eq!(m["icons"].as_array().map(Vec::len), Some(1));
    }
}
