//! Keyword matching over free text
//!
//! Phrases are compared literally and case-insensitively. An occurrence only
//! counts when it is delimited by non-alphanumeric characters or the edges of
//! the text, so "AI" matches "AI-enabled" but not "maintain".

/// Match `text` against `keywords`, returning the matched phrases in list order
pub fn match_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    KeywordMatcher::new(keywords.iter().cloned()).matches(text)
}

/// A keyword list prepared for repeated matching
#[derive(Debug, Clone, Default)]
pub struct KeywordMatcher {
    keywords: Vec<Keyword>,
}

#[derive(Debug, Clone)]
struct Keyword {
    /// Phrase as configured, returned to callers
    phrase: String,
    /// Lower-cased, trimmed form used for searching
    needle: String,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|phrase| {
                let phrase = phrase.into();
                let needle = phrase.trim().to_lowercase();
                Keyword { phrase, needle }
            })
            .collect();
        Self { keywords }
    }

    /// All phrases that occur in `text`, each at most once, in list order
    pub fn matches(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| contains_phrase(&haystack, &k.needle))
            .map(|k| k.phrase.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();

        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            return true;
        }

        // Retry one character further so overlapping candidates are not skipped
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }

    false
}

fn is_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| !c.is_alphanumeric())
}
