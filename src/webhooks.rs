//! C4 — webhook ingress: validates incoming change events and forwards them
//! to the owning collection mirror (spec §4.4).

use crate::error::AppError;
use crate::mirror::{Mirror, MirrorEntity};
use crate::models::{AlternativeName, ExternalGame, Game, GameLocalization, PassthroughEntity};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// A delete payload only needs to carry the id; the full entity body is not
/// guaranteed to be present on a delete event.
#[derive(Debug, Deserialize)]
struct IdOnly {
    #[serde(rename = "id")]
    id: u64,
}

pub struct WebhookIngress {
    pub configured_secret: String,
    pub games: Arc<Mirror<Game>>,
    pub alternative_names: Arc<Mirror<AlternativeName>>,
    pub external_games: Arc<Mirror<ExternalGame>>,
    pub game_localizations: Arc<Mirror<GameLocalization>>,
    pub companies: Arc<Mirror<PassthroughEntity>>,
}

impl WebhookIngress {
    pub async fn dispatch(
        &self,
        provided_secret: &str,
        entity: &str,
        method: &str,
        payload: Value,
    ) -> Result<(), AppError> {
        if provided_secret != self.configured_secret {
            return Err(AppError::BadInput("invalid webhook secret".to_string()));
        }
        match entity {
            "games" => Self::apply(&self.games, method, payload).await,
            "alternative_names" => Self::apply(&self.alternative_names, method, payload).await,
            "external_games" => Self::apply(&self.external_games, method, payload).await,
            "game_localizations" => Self::apply(&self.game_localizations, method, payload).await,
            "companies" => Self::apply(&self.companies, method, payload).await,
            other => Err(AppError::BadInput(format!("unknown webhook entity: {other}"))),
        }
    }

    async fn apply<T: MirrorEntity + for<'de> Deserialize<'de>>(
        mirror: &Mirror<T>,
        method: &str,
        payload: Value,
    ) -> Result<(), AppError> {
        match method {
            "create" | "update" => {
                let item: T = serde_json::from_value(payload).map_err(|err| {
                    AppError::BadInput(format!("invalid webhook payload: {err}"))
                })?;
                mirror
                    .add(vec![item])
                    .await
                    .map_err(|err| AppError::UpstreamFailure(err.to_string()))
            }
            "delete" => {
                let id_only: IdOnly = serde_json::from_value(payload).map_err(|err| {
                    AppError::BadInput(format!("invalid webhook delete payload: {err}"))
                })?;
                mirror
                    .delete_by_id(id_only.id)
                    .await
                    .map_err(|err| AppError::UpstreamFailure(err.to_string()))
            }
            other => Err(AppError::BadInput(format!("unknown webhook method: {other}"))),
        }
    }
}
