//! Name sanitization (spec §4.5 step 1, §8.1-4): a pure, idempotent function
//! applied to both the request name and every candidate's raw name before
//! any comparison happens.

use once_cell::sync::Lazy;
use regex::Regex;

/// `"<stem>, <article>"` → `"<article> <stem>"`, article case preserved.
static ARTICLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+),\s*(the|a|an|der|das|die)$").unwrap());
static BRACKET_GROUPS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\[.+?\]").unwrap(),
        Regex::new(r"\(.+?\)").unwrap(),
        Regex::new(r"\{.+?\}").unwrap(),
    ]
});
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Trademark/registration glyphs stripped outright; their bracketed textual
/// equivalents (`"(TM)"`, `"(R)"`) are already gone by the time this runs,
/// since bracket removal happens first.
const TRADEMARK_GLYPHS: [char; 3] = ['™', '®', '©'];

/// Rewrites trailing `", The"`-style suffixes, strips bracketed asides and
/// trademark glyphs, normalizes punctuation, and collapses whitespace.
/// Idempotent: `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(name: &str) -> String {
    let mut out = name.to_string();

    if let Some(caps) = ARTICLE_SUFFIX.captures(&out) {
        let stem = caps[1].trim().to_string();
        let article = caps[2].to_string();
        out = format!("{article} {stem}");
    }

    for pattern in BRACKET_GROUPS.iter() {
        out = pattern.replace_all(&out, "").to_string();
    }

    out.retain(|c| !TRADEMARK_GLYPHS.contains(&c));

    out = out.replace('_', " ").replace('.', " ");
    out = out.replace('’', "'");
    out = out.replace('\\', "");

    WHITESPACE_RUN.replace_all(out.trim(), " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_trailing_article() {
        assert_eq!(sanitize("Hobbit, the"), "the Hobbit");
        assert_eq!(sanitize("Witcher 3, The"), "The Witcher 3");
    }

    #[test]
    fn strips_bracketed_asides() {
        assert_eq!(sanitize("Doom (2016)"), "Doom");
        assert_eq!(sanitize("Doom [Definitive Edition]"), "Doom");
        assert_eq!(sanitize("Quake {Remaster}"), "Quake");
    }

    #[test]
    fn strips_trademark_glyphs() {
        assert_eq!(sanitize("Half-Life™"), "Half-Life");
        assert_eq!(sanitize("Pokémon® Red"), "Pokémon Red");
    }

    #[test]
    fn normalizes_punctuation_and_collapses_whitespace() {
        assert_eq!(sanitize("Half_Life.2"), "Half Life 2");
        assert_eq!(sanitize("Baldur’s   Gate"), "Baldur's Gate");
        assert_eq!(sanitize("Deus\\Ex"), "DeusEx");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "Hobbit, the",
            "Doom (2016) [HD]™",
            "Half_Life.2",
            "Plain Title",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
