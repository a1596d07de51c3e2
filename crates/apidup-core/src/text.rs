//! Text tokenization for the built-in embedder

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "if", "in", "into",
            "is", "it", "its", "of", "on", "or", "that", "the", "their", "this", "to", "via",
            "was", "will", "with",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Lower-case, split on non-alphanumeric characters, drop stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let stop_words = stop_words();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .filter(|s| !stop_words.contains(s))
        .map(|s| s.to_string())
        .collect()
}

/// Tokenize text, optionally reducing each token with Porter stemming
///
/// Stemming lets "Retrieve users" and "retrieving user" share terms.
pub fn tokenize_with_stemming(text: &str, stem: bool) -> Vec<String> {
    let tokens = tokenize(text);
    if !stem {
        return tokens;
    }

    let stemmer = stemmer();
    tokens.iter().map(|t| stemmer.stem(t).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_description() {
        let tokens = tokenize("Retrieve the user profile information");
        assert_eq!(tokens, vec!["retrieve", "user", "profile", "information"]);
    }

    #[test]
    fn test_tokenize_splits_paths_and_verbs() {
        let tokens = tokenize("GET /api/v1/users/{id} - Fetch a user");
        assert_eq!(
            tokens,
            vec!["get", "api", "v1", "users", "id", "fetch", "user"]
        );
    }

    #[test]
    fn test_tokenize_only_stop_words() {
        assert!(tokenize("the a of to").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_stemming_disabled_keeps_plurals() {
        let tokens = tokenize_with_stemming("users accounts", false);
        assert_eq!(tokens, vec!["users", "accounts"]);
    }

    #[test]
    fn test_stemming_merges_word_forms() {
        let a = tokenize_with_stemming("Retrieving users", true);
        let b = tokenize_with_stemming("retrieve user", true);
        assert_eq!(a, b);
    }
}
