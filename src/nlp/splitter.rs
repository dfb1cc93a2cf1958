//! Abbreviation-aware sentence splitting
//!
//! Line breaks always end a sentence, so headlines without a full stop stay
//! separate. Inside a line a run of terminal punctuation ends a sentence when
//! it is followed by whitespace, unless the period belongs to a known
//! abbreviation or an initial.

use rustc_hash::FxHashSet;

/// Abbreviations recognized by default
pub const DEFAULT_ABBREVIATIONS: &[&str] =
    &["dr", "vs", "mr", "mrs", "ms", "prof", "mt", "inc", "i.e", "e.g"];

/// Splits text into display sentences
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    /// Lowercase abbreviations without their trailing period
    abbreviations: FxHashSet<String>,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSplitter {
    /// Create a splitter with the default abbreviations
    pub fn new() -> Self {
        Self::with_abbreviations(DEFAULT_ABBREVIATIONS.iter().copied())
    }

    /// Create a splitter with a custom abbreviation set
    pub fn with_abbreviations<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abbreviations = words
            .into_iter()
            .map(|w| w.as_ref().trim().trim_end_matches('.').to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { abbreviations }
    }

    /// Split text into trimmed, whitespace-collapsed sentences
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for line in text.lines() {
            self.split_line(line, &mut sentences);
        }
        sentences
    }

    fn split_line(&self, line: &str, sentences: &mut Vec<String>) {
        let chars: Vec<char> = line.chars().collect();
        let mut current = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            current.push(c);
            i += 1;

            if !is_terminal(c) {
                continue;
            }

            // "..." and "?!" end a sentence as one unit
            let mut run_len = 1;
            while i < chars.len() && is_terminal(chars[i]) {
                current.push(chars[i]);
                i += 1;
                run_len += 1;
            }

            // Closing quotes and brackets belong to the sentence they close
            while i < chars.len() && is_closing(chars[i]) {
                current.push(chars[i]);
                i += 1;
            }

            let at_boundary = i >= chars.len() || chars[i].is_whitespace();
            if !at_boundary {
                continue;
            }

            if run_len == 1 && c == '.' && self.ends_with_abbreviation(&current) {
                continue;
            }

            push_sentence(&current, sentences);
            current.clear();
        }

        push_sentence(&current, sentences);
    }

    /// Check whether the word before the final period is an abbreviation
    fn ends_with_abbreviation(&self, current: &str) -> bool {
        let word = match current.split_whitespace().last() {
            Some(word) => word,
            None => return false,
        };
        let word = word
            .trim_end_matches('.')
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        if word.is_empty() {
            return false;
        }
        if self.abbreviations.contains(&word) {
            return true;
        }

        // Initials: "J." or dotted letter groups such as "U.S."
        word.split('.')
            .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']' | '»')
}

fn push_sentence(raw: &str, sentences: &mut Vec<String>) {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        sentences.push(collapsed);
    }
}
