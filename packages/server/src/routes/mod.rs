mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// Routes mounted under `/api`. Paths in handler docs are relative to the version prefix.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}
