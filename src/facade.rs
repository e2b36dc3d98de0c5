//! C6 — query façade: `get_game`, `search`, `get_metadata` (spec §4.6). Each
//! operation returns the shared `DataResponse<T>`/`ErrorResponse` envelope
//! rather than a bare `Result`, since "not found" and "no match" are
//! ordinary response shapes here, not failures (spec §7).

use crate::error::AppError;
use crate::matcher::Matcher;
use crate::mirror::Mirror;
use crate::models::{
    library_id_category, DataResponse, ErrorResponse, ExternalGame, Game, MetadataRequest,
    SearchRequest,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::instrument;

/// Rejects `id == 0` before any lookup is attempted (spec §4.6). Pulled out
/// as a pure function so the guard itself is unit-testable without a store.
fn validate_game_id(id: u64) -> Result<u64, AppError> {
    if id == 0 {
        return Err(AppError::BadInput("No ID specified.".to_string()));
    }
    Ok(id)
}

pub struct Facade {
    games: Arc<Mirror<Game>>,
    external_games: Arc<Mirror<ExternalGame>>,
    matcher: Matcher,
}

impl Facade {
    pub fn new(
        games: Arc<Mirror<Game>>,
        external_games: Arc<Mirror<ExternalGame>>,
        matcher: Matcher,
    ) -> Self {
        Self {
            games,
            external_games,
            matcher,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_game(&self, id: u64) -> Result<Result<DataResponse<Game>, ErrorResponse>> {
        let id = match validate_game_id(id) {
            Ok(id) => id,
            Err(err) => return Ok(Err(err.into())),
        };
        match self.games.get_item(id).await? {
            Some(game) => Ok(Ok(DataResponse::new(game))),
            None => Ok(Err(AppError::NotFound("Game not found.".to_string()).into())),
        }
    }

    #[instrument(skip(self, request))]
    pub async fn search(
        &self,
        request: Option<SearchRequest>,
    ) -> Result<Result<DataResponse<Vec<Game>>, ErrorResponse>> {
        let request = match request {
            Some(request) => request,
            None => return Ok(Err(ErrorResponse::new("Missing search data."))),
        };
        if request.search_term.trim().is_empty() {
            return Ok(Err(ErrorResponse::new("No search term")));
        }
        let games = self.matcher.search(&request.search_term, true).await?;
        Ok(Ok(DataResponse::new(games)))
    }

    #[instrument(skip(self, request))]
    pub async fn get_metadata(
        &self,
        request: Option<MetadataRequest>,
    ) -> Result<Result<DataResponse<Option<Game>>, ErrorResponse>> {
        let request = match request {
            Some(request) => request,
            None => return Ok(Err(ErrorResponse::new("Missing metadata data."))),
        };

        if let Some(game) = self.external_store_shortcut(&request).await? {
            return Ok(Ok(DataResponse::new(Some(game))));
        }

        let matched = self.matcher.match_request(&request).await?;
        Ok(Ok(DataResponse::new(matched)))
    }

    /// `library_id` + non-empty `game_id` resolve through `ExternalGame`
    /// before the matcher ever runs (spec §4.5.4).
    async fn external_store_shortcut(&self, request: &MetadataRequest) -> Result<Option<Game>> {
        let library_id = match request.library_id {
            Some(library_id) => library_id,
            None => return Ok(None),
        };
        let game_id = match request.game_id.as_deref() {
            Some(game_id) if !game_id.is_empty() => game_id,
            _ => return Ok(None),
        };
        let category = match library_id_category(&library_id) {
            Some(category) => category,
            None => return Ok(None),
        };

        let filter = bson::doc! { "uid": game_id, "category": category.0 };
        let matches = self.external_games.store().find_by_composite(filter).await?;
        let Some(external_game) = matches.into_iter().next() else {
            return Ok(None);
        };
        self.games.get_item(external_game.game).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_game_id_rejects_zero() {
        let err = validate_game_id(0).unwrap_err();
        let response: ErrorResponse = err.into();
        assert_eq!(response.error, "No ID specified.");
    }

    #[test]
    fn validate_game_id_accepts_nonzero() {
        assert_eq!(validate_game_id(42).unwrap(), 42);
    }
}
