use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/authors", author_routes())
        .nest("/posts", post_routes(config))
        .nest("/media", media_routes())
        .nest("/categories", category_routes())
        .nest("/tags", tag_routes())
}

fn author_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::author::register))
        .routes(routes!(handlers::author::login))
        .routes(routes!(handlers::author::get_author))
}

fn post_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let create = OpenApiRouter::new()
        .routes(routes!(handlers::post::create_post))
        .layer(handlers::post::create_post_body_limit(
            config.storage.max_blob_size,
        ));

    OpenApiRouter::new()
        .routes(routes!(handlers::post::get_post))
        .merge(create)
}

fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::media::get_media))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::category::create_category))
        .routes(routes!(handlers::category::list_category_posts))
}

fn tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::tag::list_tag_posts))
}
