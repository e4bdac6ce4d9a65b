use axum::routing::post;
use axum::Router;

use crate::handlers::reconstruction;
use crate::state::AppState;

/// Relay routes.
///
/// ```text
/// POST   /video2glb        video_to_glb (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/video2glb", post(reconstruction::video_to_glb))
}
