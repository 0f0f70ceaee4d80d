//! Repository import input validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::ClientError;

const REPO_URL_PATTERNS: [&str; 3] = [
    r"^https?://github\.com/[\w-]+/[\w.-]+$",
    r"^github\.com/[\w-]+/[\w.-]+$",
    r"^[\w-]+/[\w.-]+$",
];

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        REPO_URL_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Accepts `https://github.com/owner/repo`, `github.com/owner/repo` or
/// `owner/repo`. Returns the trimmed input unchanged.
pub fn validate_repo_url(input: &str) -> Result<&str, ClientError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput("Please enter a repository URL".into()));
    }
    if patterns().iter().any(|re| re.is_match(trimmed)) {
        Ok(trimmed)
    } else {
        Err(ClientError::InvalidInput(
            "Invalid GitHub URL. Use https://github.com/owner/repo or owner/repo".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(patterns().len(), REPO_URL_PATTERNS.len());
    }

    #[test]
    fn test_accepted_forms() {
        for url in [
            "https://github.com/rust-lang/rust",
            "http://github.com/tokio-rs/tokio",
            "github.com/serde-rs/serde.rs",
            "ada/engine",
            "  ada/engine  ",
        ] {
            assert!(validate_repo_url(url).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn test_rejected_forms() {
        for url in [
            "",
            "engine",
            "https://gitlab.com/ada/engine",
            "https://github.com/ada/engine/tree/main",
            "ada/engine extra",
        ] {
            assert!(validate_repo_url(url).is_err(), "{url:?} should be rejected");
        }
    }
}
