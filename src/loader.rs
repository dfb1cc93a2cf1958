//! Document acquisition
//!
//! A [`TextLoader`] turns a caller-supplied input (raw text, a `.txt` path or
//! an `http(s)://` URL) into plain text. The summarizers call it exactly once
//! per document, before any other stage.

use crate::errors::{Result, SummarizeError};
use std::path::Path;

/// Resolves an input string into plain text
pub trait TextLoader: Send + Sync {
    /// Load the text behind `input`
    fn load(&self, input: &str) -> Result<String>;
}

/// The kind of input a string denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// An `http://` or `https://` URL
    Url,
    /// A path to a `.txt` file
    TextFile,
    /// The text itself
    Raw,
}

impl InputKind {
    /// Classify an input string
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        let lowered = trimmed.to_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            InputKind::Url
        } else if lowered.ends_with(".txt") && !trimmed.contains('\n') {
            InputKind::TextFile
        } else {
            InputKind::Raw
        }
    }
}

/// Loader handling raw strings, text files and (with the `http` feature) URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextLoader;

impl DefaultTextLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }

    /// Read a UTF-8 text file
    pub fn load_file(path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SummarizeError::io(path, e))?;
        String::from_utf8(bytes).map_err(|_| {
            SummarizeError::input(format!("{} is not valid UTF-8 text", path.display()))
        })
    }

    #[cfg(feature = "http")]
    fn load_url(url: &str) -> Result<String> {
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| SummarizeError::input(format!("failed to fetch {url}: {e}")))?;
        let body = response
            .text()
            .map_err(|e| SummarizeError::input(format!("failed to read body of {url}: {e}")))?;

        let text = html::article_text(&body);
        if text.trim().is_empty() {
            return Err(SummarizeError::input(format!("no article text found at {url}")));
        }
        Ok(text)
    }

    #[cfg(not(feature = "http"))]
    fn load_url(url: &str) -> Result<String> {
        Err(SummarizeError::input(format!(
            "cannot fetch {url}: URL loading requires the `http` feature"
        )))
    }
}

impl TextLoader for DefaultTextLoader {
    fn load(&self, input: &str) -> Result<String> {
        match InputKind::detect(input) {
            InputKind::Url => Self::load_url(input.trim()),
            InputKind::TextFile => Self::load_file(input.trim()),
            InputKind::Raw => Ok(input.to_string()),
        }
    }
}

/// Loader that never touches the file system or network
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextLoader;

impl TextLoader for RawTextLoader {
    fn load(&self, input: &str) -> Result<String> {
        Ok(input.to_string())
    }
}

#[cfg(feature = "http")]
mod html {
    use regex::Regex;
    use std::sync::OnceLock;

    fn paragraph_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid regex"))
    }

    fn noise_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
                .expect("valid regex")
        })
    }

    fn tag_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"))
    }

    /// Reduce an HTML page to its paragraph text, one paragraph per line
    pub(super) fn article_text(body: &str) -> String {
        let body = noise_re().replace_all(body, " ");
        let paragraphs: Vec<String> = paragraph_re()
            .captures_iter(&body)
            .map(|cap| decode_entities(&tag_re().replace_all(&cap[1], " ")))
            .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|p| !p.is_empty())
            .collect();

        if paragraphs.is_empty() {
            // Not article-shaped; fall back to all visible text.
            return decode_entities(&tag_re().replace_all(&body, "\n"));
        }
        paragraphs.join("\n")
    }

    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_article_text_keeps_paragraphs() {
            let html = r#"<html><head><script>var x = "<p>no</p>";</script></head>
                <body><p class="lead">First <b>bold</b> paragraph.</p>
                <div>menu</div><p>Second &amp; last.</p></body></html>"#;
            assert_eq!(
                article_text(html),
                "First bold paragraph.\nSecond & last."
            );
        }
    }
}
