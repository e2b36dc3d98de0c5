//! Two-source search (spec §4.5.1, §4.5.2, §8.7-9): a primary text search
//! over `Game.name` filtered to the default search categories, and a
//! secondary text search over `AlternativeName.name` expanded through the
//! owning `Game`, merged and stable-sorted by score.

use crate::mirror::Mirror;
use crate::models::{AlternativeName, Game, DEFAULT_SEARCH_CATEGORIES};
use crate::store::Scored;
use anyhow::Result;
use bson::doc;
use std::collections::HashSet;

const SEARCH_LIMIT: i64 = 30;

/// Primary-name text search restricted to the fixed `default_search_categories`.
pub async fn search_by_name(games: &Mirror<Game>, term: &str) -> Result<Vec<Scored<Game>>> {
    let categories: Vec<i32> = DEFAULT_SEARCH_CATEGORIES.iter().map(|c| c.0).collect();
    let filter = doc! { "category": { "$in": categories } };
    games.store().text_search(term, Some(filter), SEARCH_LIMIT).await
}

/// Alternative-name text search, expanded through each hit's owning `Game`.
/// A dangling `AlternativeName.game` reference (the `Game` row missing
/// locally) is dropped rather than treated as an error (spec §7).
pub async fn search_by_alternative_names(
    alternative_names: &Mirror<AlternativeName>,
    games: &Mirror<Game>,
    term: &str,
) -> Result<Vec<Scored<Game>>> {
    let hits = alternative_names
        .store()
        .text_search(term, None, SEARCH_LIMIT)
        .await?;
    let mut out = Vec::with_capacity(hits.len());
    for hit in hits {
        if let Some(game) = games.get_item(hit.item.game).await? {
            out.push(Scored {
                score: hit.score,
                item: game,
            });
        }
    }
    Ok(out)
}

/// Concatenates primary-then-alternative results, stable-sorts by score
/// descending (primary results win ties, matching query order), and
/// optionally drops later occurrences of a `Game.id` already seen.
pub fn merge(
    primary: Vec<Scored<Game>>,
    alternatives: Vec<Scored<Game>>,
    remove_duplicates: bool,
) -> Vec<Game> {
    let mut merged = primary;
    merged.extend(alternatives);
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    if !remove_duplicates {
        return merged.into_iter().map(|scored| scored.item).collect();
    }

    let mut seen = HashSet::with_capacity(merged.len());
    merged
        .into_iter()
        .filter(|scored| seen.insert(scored.item.id))
        .map(|scored| scored.item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u64) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            category: crate::models::GameCategory::MAIN_GAME,
            first_release_date: 0,
            extra: bson::Document::new(),
        }
    }

    #[test]
    fn merge_sorts_score_descending() {
        let primary = vec![Scored { score: 1.0, item: game(1) }];
        let alternatives = vec![Scored { score: 5.0, item: game(2) }];
        let merged = merge(primary, alternatives, false);
        assert_eq!(merged.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn merge_dedup_keeps_first_higher_scored_occurrence() {
        let primary = vec![Scored { score: 3.0, item: game(1) }];
        let alternatives = vec![
            Scored { score: 9.0, item: game(2) },
            Scored { score: 1.0, item: game(1) },
        ];
        let merged = merge(primary, alternatives, true);
        let ids: Vec<u64> = merged.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(ids.iter().filter(|&&id| id == 1).count(), 1);
    }

    #[test]
    fn merge_without_dedup_preserves_all_occurrences() {
        let primary = vec![Scored { score: 3.0, item: game(1) }];
        let alternatives = vec![Scored { score: 3.0, item: game(1) }];
        let merged = merge(primary, alternatives, false);
        assert_eq!(merged.len(), 2);
    }
}
