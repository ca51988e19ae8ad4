use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(post_routes())
        .merge(tag_routes())
        .merge(snapshot_routes())
        .merge(comment_routes())
        .routes(routes!(handlers::removed::list_removed))
}

fn post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::post::list_posts,
            handlers::post::create_post
        ))
        .routes(routes!(
            handlers::post::get_post,
            handlers::post::update_post,
            handlers::post::remove_post
        ))
        .routes(routes!(handlers::post::edit_post_tags))
        .routes(routes!(handlers::post::restore_post))
        .routes(routes!(
            handlers::post::cast_vote,
            handlers::post::clear_vote
        ))
}

fn tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::tag::list_tags, handlers::tag::create_tag))
        .routes(routes!(handlers::tag::get_tag, handlers::tag::update_tag))
}

fn snapshot_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::snapshot::list_post_snapshots))
        .routes(routes!(handlers::snapshot::get_snapshot))
        .routes(routes!(handlers::snapshot::revert_snapshot))
}

fn comment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::comment::list_comments,
            handlers::comment::create_comment
        ))
        .routes(routes!(handlers::comment::remove_comment))
        .routes(routes!(handlers::comment::restore_comment))
}
