//! Seven-pass disambiguation (spec §4.5.3, §8): given an already-sanitized
//! request name and the candidate set `R` returned by [`super::search`],
//! work through a fixed sequence of progressively looser comparisons and
//! stop at the first pass that resolves to exactly one candidate (breaking
//! ties by release year, or falling back to the oldest dated candidate).

use crate::matcher::roman::romanize_digit_runs;
use crate::matcher::sanitize::sanitize;
use crate::models::Game;
use chrono::{Datelike, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static AND_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());
static COLON_OR_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[:\-]\s*").unwrap());

/// Runs the seven passes in order and returns the first resolved match, if
/// any. `n0` must already be sanitized; each candidate's raw `name` is
/// sanitized here before comparison.
pub fn disambiguate(n0: &str, release_year: i32, candidates: &[Game]) -> Option<Game> {
    let sanitized: Vec<(String, &Game)> = candidates
        .iter()
        .map(|game| (sanitize(&game.name), game))
        .collect();

    // P1 — exact match on the sanitized names.
    if let Some(game) = run_pass(n0, &sanitized, release_year, |candidate| candidate.to_string()) {
        return Some(game);
    }

    // P2 — digit runs in N converted to Roman numerals.
    let n2 = romanize_digit_runs(n0);
    if let Some(game) = run_pass(&n2, &sanitized, release_year, |candidate| candidate.to_string()) {
        return Some(game);
    }

    // P3 — N prefixed with "The ".
    let n3 = format!("The {n0}");
    if let Some(game) = run_pass(&n3, &sanitized, release_year, |candidate| candidate.to_string()) {
        return Some(game);
    }

    // P4 — "and" rewritten to "&" in N.
    let n4 = AND_WORD.replace_all(n0, " & ").to_string();
    if let Some(game) = run_pass(&n4, &sanitized, release_year, |candidate| candidate.to_string()) {
        return Some(game);
    }

    // P5 — apostrophes stripped from the candidate side only.
    if let Some(game) = run_pass(n0, &sanitized, release_year, |candidate| {
        candidate.replace('\'', "")
    }) {
        return Some(game);
    }

    // P6 — ':' and '-' separators collapsed to a single space on both sides.
    let n6 = COLON_OR_DASH.replace_all(n0, " ").to_string();
    if let Some(game) = run_pass(&n6, &sanitized, release_year, |candidate| {
        COLON_OR_DASH.replace_all(candidate, " ").to_string()
    }) {
        return Some(game);
    }

    // P7 — subtitle trim: first candidate whose pre-colon segment equals N.
    for (name, game) in &sanitized {
        if let Some(idx) = name.find(':') {
            if name[..idx].trim().eq_ignore_ascii_case(n0) {
                return Some((*game).clone());
            }
        }
    }

    None
}

/// Applies `candidate_transform` to every candidate's sanitized name, keeps
/// those equal to `n` case-insensitively, and resolves the result. Returning
/// `None` from a multi-match tie-break (release year given but no candidate
/// carries it) means the whole pass fails, letting the caller move to the
/// next pass rather than guessing among the remaining ties.
fn run_pass(
    n: &str,
    sanitized: &[(String, &Game)],
    release_year: i32,
    candidate_transform: impl Fn(&str) -> String,
) -> Option<Game> {
    let matches: Vec<&Game> = sanitized
        .iter()
        .filter(|(name, _)| candidate_transform(name).eq_ignore_ascii_case(n))
        .map(|(_, game)| *game)
        .collect();

    match matches.len() {
        0 => None,
        1 => Some(matches[0].clone()),
        _ => tie_break(&matches, release_year),
    }
}

fn tie_break(matches: &[&Game], release_year: i32) -> Option<Game> {
    if release_year > 0 {
        return matches
            .iter()
            .find(|game| epoch_year(game.first_release_date) == release_year)
            .map(|game| (*game).clone());
    }

    if matches.iter().all(|game| game.first_release_date == 0) {
        return Some(matches[0].clone());
    }

    matches
        .iter()
        .filter(|game| game.first_release_date > 0)
        .min_by_key(|game| game.first_release_date)
        .or_else(|| matches.first())
        .map(|game| (*game).clone())
}

fn epoch_year(seconds: i64) -> i32 {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.year())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameCategory;

    fn game(id: u64, name: &str, first_release_date: i64) -> Game {
        Game {
            id,
            name: name.to_string(),
            category: GameCategory::MAIN_GAME,
            first_release_date,
            extra: bson::Document::new(),
        }
    }

    #[test]
    fn p1_resolves_exact_match() {
        let candidates = vec![game(1, "Doom", 0)];
        let result = disambiguate("Doom", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p2_resolves_via_roman_numerals() {
        let candidates = vec![game(1, "Final Fantasy XIV", 0)];
        let result = disambiguate("Final Fantasy 14", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p3_resolves_via_the_prefix() {
        let candidates = vec![game(1, "The Witcher 3", 0)];
        let result = disambiguate("Witcher 3", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p4_resolves_via_and_ampersand_rewrite() {
        let candidates = vec![game(1, "Will & Test", 0)];
        let result = disambiguate("Will and Test", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p5_resolves_ignoring_candidate_apostrophe() {
        let candidates = vec![game(1, "Baldurs Gate", 0)];
        let result = disambiguate("Baldur's Gate", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p6_resolves_ignoring_separators() {
        let candidates = vec![game(1, "Half Life 2", 0)];
        let result = disambiguate("Half-Life 2", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn p7_resolves_via_subtitle_trim() {
        let candidates = vec![game(1, "Diablo: Resurrected", 0)];
        let result = disambiguate("Diablo", 0, &candidates);
        assert_eq!(result.unwrap().id, 1);
    }

    #[test]
    fn tie_break_prefers_matching_release_year() {
        let candidates = vec![
            game(1, "Doom", 946_684_800),  // 2000
            game(2, "Doom", 1_577_836_800), // 2020
        ];
        let result = disambiguate("Doom", 2020, &candidates);
        assert_eq!(result.unwrap().id, 2);
    }

    #[test]
    fn tie_break_falls_back_to_oldest_dated_candidate() {
        let candidates = vec![
            game(1, "Doom", 1_577_836_800), // 2020
            game(2, "Doom", 946_684_800),  // 2000
        ];
        let result = disambiguate("Doom", 0, &candidates);
        assert_eq!(result.unwrap().id, 2);
    }

    #[test]
    fn no_match_returns_none() {
        let candidates = vec![game(1, "Portal", 0)];
        assert!(disambiguate("Quake", 0, &candidates).is_none());
    }
}
