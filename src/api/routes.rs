//! API route configuration (spec §6).

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/igdb")
                .route("/game/{id}", web::get().to(handlers::get_game))
                .route("/search", web::post().to(handlers::search))
                .route("/metadata", web::post().to(handlers::get_metadata))
                .route(
                    "/webhooks/{entity}/{method}",
                    web::post().to(handlers::webhook),
                ),
        );
}
