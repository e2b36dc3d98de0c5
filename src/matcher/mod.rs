//! C5 — title matching: sanitize, two-source search, seven-pass
//! disambiguation (spec §4.5).

pub mod disambiguate;
pub mod roman;
pub mod sanitize;
pub mod search;

use crate::mirror::Mirror;
use crate::models::{AlternativeName, Game, MetadataRequest};
use anyhow::Result;
use std::sync::Arc;

/// Ties the two search sources and the disambiguation pipeline together into
/// the single entry point the façade calls.
pub struct Matcher {
    games: Arc<Mirror<Game>>,
    alternative_names: Arc<Mirror<AlternativeName>>,
}

impl Matcher {
    pub fn new(games: Arc<Mirror<Game>>, alternative_names: Arc<Mirror<AlternativeName>>) -> Self {
        Self {
            games,
            alternative_names,
        }
    }

    /// Runs both search sources for `term` and merges them (spec §4.5.1-2).
    pub async fn search(&self, term: &str, remove_duplicates: bool) -> Result<Vec<Game>> {
        let primary = search::search_by_name(&self.games, term).await?;
        let alternatives =
            search::search_by_alternative_names(&self.alternative_names, &self.games, term)
                .await?;
        Ok(search::merge(primary, alternatives, remove_duplicates))
    }

    /// Sanitizes the request name, searches without deduplication, then runs
    /// the seven-pass disambiguation over the candidate set (spec §4.5.3).
    /// Returns `None` for an empty/missing name or when no pass resolves.
    pub async fn match_request(&self, request: &MetadataRequest) -> Result<Option<Game>> {
        let raw_name = match request.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Ok(None),
        };
        let n0 = sanitize::sanitize(raw_name);
        let candidates = self.search(&n0, false).await?;
        let release_year = request.release_year.unwrap_or(0);
        Ok(disambiguate::disambiguate(&n0, release_year, &candidates))
    }
}
