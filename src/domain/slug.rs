//! Deterministic, human-friendly slugs for category names.
//!
//! Derivation is pure: the same name always yields the same slug, and
//! uniqueness is left to the store's constraint so concurrent creates cannot
//! silently diverge.

use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a URL-friendly slug from the provided human-readable name.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        assert_eq!(derive_slug("Silk Sarees").expect("slug"), "silk-sarees");
    }

    #[test]
    fn derive_slug_strips_accents_and_punctuation() {
        assert_eq!(
            derive_slug("Fête / Collection!").expect("slug"),
            "fete-collection"
        );
    }

    #[test]
    fn derive_slug_is_deterministic() {
        let first = derive_slug("Handloom Cotton").expect("slug");
        let second = derive_slug("Handloom Cotton").expect("slug");
        assert_eq!(first, second);
    }

    #[test]
    fn derive_slug_rejects_empty_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn derive_slug_rejects_unrepresentable_input() {
        assert_eq!(
            derive_slug("!!!"),
            Err(SlugError::Unrepresentable {
                input: "!!!".to_string()
            })
        );
    }
}
