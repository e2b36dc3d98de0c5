//! Roman numeral conversion (spec §4.5 pass P2, §8.5): digits 1-3999 convert,
//! anything else is returned unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Converts `n` to its Roman numeral spelling. Values outside `1..=3999`
/// have no standard Roman form and are returned as their decimal string.
pub fn to_roman(mut n: u32) -> String {
    if !(1..=3999).contains(&n) {
        return n.to_string();
    }
    let mut out = String::new();
    for (value, symbol) in TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Replaces every run of digits in `input` with its Roman numeral spelling,
/// leaving non-numeric substrings untouched (spec §4.5 pass P2).
pub fn romanize_digit_runs(input: &str) -> String {
    DIGIT_RUN
        .replace_all(input, |caps: &Captures| match caps[0].parse::<u32>() {
            Ok(n) => to_roman(n),
            Err(_) => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_values() {
        assert_eq!(to_roman(1), "I");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(9), "IX");
        assert_eq!(to_roman(40), "XL");
        assert_eq!(to_roman(1994), "MCMXCIV");
        assert_eq!(to_roman(3999), "MMMCMXCIX");
    }

    #[test]
    fn out_of_range_is_unchanged() {
        assert_eq!(to_roman(0), "0");
        assert_eq!(to_roman(4000), "4000");
    }

    #[test]
    fn replaces_digit_runs_in_titles() {
        assert_eq!(romanize_digit_runs("Final Fantasy 14"), "Final Fantasy XIV");
        assert_eq!(romanize_digit_runs("Doom 2016"), "Doom MMXVI");
        assert_eq!(romanize_digit_runs("No digits here"), "No digits here");
    }
}
