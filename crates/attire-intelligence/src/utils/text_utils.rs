//! Key normalization and display helpers shared by providers and builders

use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref NON_ALNUM_REGEX: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

pub struct TextUtils;

impl TextUtils {
    /// Lowercase, collapse every non-alphanumeric run to `_`, trim edge underscores.
    /// "Hotel Ballroom" and "hotel-ballroom" both become "hotel_ballroom".
    pub fn normalize_key(text: &str) -> String {
        let lower = text.trim().to_lowercase();
        NON_ALNUM_REGEX
            .replace_all(&lower, "_")
            .trim_matches('_')
            .to_string()
    }

    /// Same as `normalize_key` but joined with `-`, the product tag vocabulary form
    pub fn normalize_tag(text: &str) -> String {
        Self::normalize_key(text).replace('_', "-")
    }

    /// "country_club" -> "Country Club"
    pub fn title_case(key: &str) -> String {
        key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if text contains pattern (case-insensitive)
    pub fn contains_ignore_case(text: &str, pattern: &str) -> bool {
        if pattern.len() > text.len() {
            return false;
        }
        text.to_lowercase().contains(&pattern.to_lowercase())
    }

    /// True when every `_`-separated token of `hint` appears in `key` ("emerald" ~ "emerald_green")
    pub fn same_family(hint: &str, key: &str) -> bool {
        let hint = Self::normalize_key(hint);
        let key = Self::normalize_key(key);
        if hint.is_empty() || key.is_empty() {
            return false;
        }
        let key_tokens: Vec<&str> = key.split('_').collect();
        hint.split('_').all(|token| key_tokens.contains(&token))
    }
}

/// Append items not already present, keeping first-insertion order
pub fn extend_unique<I, S>(target: &mut Vec<String>, items: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for item in items {
        let item = item.into();
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
