//! HTTP request handlers for the IGDB mirror surface (spec §6). Every
//! application-level outcome — bad input, not-found, a null metadata match —
//! is still a 200 carrying the `{data}`/`{error}` envelope; only a genuine
//! upstream/store failure surfaces as a 500.

use crate::api::AppState;
use crate::models::{ErrorResponse, MetadataRequest, SearchRequest};
use actix_web::{web, HttpResponse};
use serde_json::Value;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

pub async fn get_game(path: web::Path<u64>, state: web::Data<AppState>) -> HttpResponse {
    let id = path.into_inner();
    match state.facade.get_game(id).await {
        Ok(Ok(data)) => HttpResponse::Ok().json(data),
        Ok(Err(err)) => HttpResponse::Ok().json(err),
        Err(err) => {
            tracing::error!(error = %err, "get_game failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
        }
    }
}

pub async fn search(
    body: Option<web::Json<SearchRequest>>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request = body.map(web::Json::into_inner);
    match state.facade.search(request).await {
        Ok(Ok(data)) => HttpResponse::Ok().json(data),
        Ok(Err(err)) => HttpResponse::Ok().json(err),
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
        }
    }
}

pub async fn get_metadata(
    body: Option<web::Json<MetadataRequest>>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request = body.map(web::Json::into_inner);
    match state.facade.get_metadata(request).await {
        Ok(Ok(data)) => HttpResponse::Ok().json(data),
        Ok(Err(err)) => HttpResponse::Ok().json(err),
        Err(err) => {
            tracing::error!(error = %err, "get_metadata failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
        }
    }
}

/// `POST /igdb/webhooks/{entity}/{method}` — the shared secret travels in
/// `X-Secret` (spec §6), the delta payload is an opaque JSON body routed by
/// entity/method onto the matching mirror.
pub async fn webhook(
    path: web::Path<(String, String)>,
    req: actix_web::HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let (entity, method) = path.into_inner();
    let provided_secret = req
        .headers()
        .get("X-Secret")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            return HttpResponse::Ok().json(ErrorResponse::new(format!(
                "invalid webhook payload: {err}"
            )))
        }
    };

    match state
        .webhooks
        .dispatch(provided_secret, &entity, &method, payload)
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => HttpResponse::Ok().json(ErrorResponse::new(err.message())),
    }
}
