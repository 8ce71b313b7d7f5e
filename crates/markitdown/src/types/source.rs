//! Input source classification

use std::fmt;
use std::path::PathBuf;

/// A single command-line input: a web page or a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// `http://` or `https://` URL
    Url(String),
    /// Local file path
    File(PathBuf),
}

impl InputSource {
    /// Classify a raw argument. Anything that is not an http(s) URL is a path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(InputSource::parse("https://example.com").is_url());
        assert!(InputSource::parse("http://example.com/a?b=c").is_url());
        assert_eq!(
            InputSource::parse("notes.txt"),
            InputSource::File(PathBuf::from("notes.txt"))
        );
        // scheme match is literal, like the command line it comes from
        assert!(!InputSource::parse("ftp://example.com").is_url());
        assert!(!InputSource::parse("HTTPS://example.com").is_url());
    }

    #[test]
    fn test_display_round_trips_argument() {
        assert_eq!(InputSource::parse("docs/report.pdf").to_string(), "docs/report.pdf");
        assert_eq!(InputSource::parse("https://a.b/c").to_string(), "https://a.b/c");
    }
}
