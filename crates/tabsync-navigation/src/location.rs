//! Page location
//!
//! Wraps the page URL. The hash fragment is exposed without its leading `#`,
//! and an absent fragment reads the same as an empty one. Fragments are kept
//! percent-encoded, as `location.hash` reports them; matching decodes.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    url: Url,
}

const BLANK: &str = "about:blank";

impl Location {
    /// Parse a page URL. Empty input resolves to `about:blank`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self {
                url: Url::parse(BLANK)?,
            });
        }

        let url = Url::parse(input).map_err(|e| {
            tracing::warn!(url = %input, error = %e, "Rejected page URL");
            NavigationError::InvalidUrl(format!("{input}: {e}"))
        })?;

        Ok(Self { url })
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Percent-encoded fragment without the leading `#`; empty when the URL has none
    pub fn hash(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    /// Copy of this location pointing at another fragment of the same page.
    ///
    /// A leading `#` is accepted and stripped. An empty fragment removes the
    /// fragment entirely.
    pub fn with_fragment(&self, fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut url = self.url.clone();
        if fragment.is_empty() {
            url.set_fragment(None);
        } else {
            url.set_fragment(Some(fragment));
        }
        Self { url }
    }

    /// Whether the current fragment names `id`, ignoring case
    pub fn hash_matches(&self, id: &str) -> bool {
        fragment_matches(self.hash(), id)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.href())
    }
}

/// Case-insensitive comparison of a hash fragment against an element id.
///
/// The fragment may be percent-encoded. An empty fragment never matches.
pub fn fragment_matches(fragment: &str, id: &str) -> bool {
    let fragment = percent_decode_str(fragment).decode_utf8_lossy();
    !fragment.is_empty() && fragment.to_lowercase() == id.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_without_prefix() {
        let location = Location::parse("https://example.com/features#Pricing").unwrap();
        assert_eq!(location.hash(), "Pricing");
        assert!(location.hash_matches("pricing"));
        assert!(!location.hash_matches("pricing-table"));
    }

    #[test]
    fn test_missing_and_empty_fragment() {
        let none = Location::parse("https://example.com/").unwrap();
        let empty = Location::parse("https://example.com/#").unwrap();
        assert_eq!(none.hash(), "");
        assert_eq!(empty.hash(), "");
        assert!(!none.hash_matches(""));
    }

    #[test]
    fn test_with_fragment() {
        let location = Location::parse("https://example.com/page?x=1#a").unwrap();

        let moved = location.with_fragment("#c");
        assert_eq!(moved.href(), "https://example.com/page?x=1#c");

        let cleared = location.with_fragment("");
        assert_eq!(cleared.href(), "https://example.com/page?x=1");
    }

    #[test]
    fn test_non_ascii_fragment() {
        let location = Location::parse("https://example.com/").unwrap().with_fragment("über");
        assert_eq!(location.hash(), "%C3%BCber");
        assert!(location.hash_matches("über"));
        assert!(location.hash_matches("Über"));

        assert!(fragment_matches("über", "über"));
        assert!(fragment_matches("%C3%9Cber", "über"));
        assert!(!fragment_matches("%C3%BC", "über"));
    }

    #[test]
    fn test_blank_location() {
        let location = Location::parse("  ").unwrap();
        assert_eq!(location.href(), "about:blank");
        assert_eq!(location.with_fragment("tab").hash(), "tab");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(Location::parse("not a url").is_err());
    }
}
