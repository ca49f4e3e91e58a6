//! Token extraction engine
//!
//! Pure pattern matching over decoded text: no I/O, no state beyond the
//! compiled patterns and the extension set. The same text region may land in
//! more than one category (a filename is also made of words).

use regex::Regex;

use crate::extensions::{self, ExtensionSet};

/// Tokens pulled out of one or more chunks of a single source.
///
/// Sequences keep match order and are not deduplicated; `underscore_parts`
/// holds the `_`-split components of every word that contained a `_`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub words: Vec<String>,
    pub hyphenated: Vec<String>,
    pub filenames: Vec<String>,
    pub underscore_parts: Vec<String>,
}

impl ExtractionResult {
    /// Append another result, preserving order.
    pub fn extend(&mut self, other: ExtractionResult) {
        self.words.extend(other.words);
        self.hyphenated.extend(other.hyphenated);
        self.filenames.extend(other.filenames);
        self.underscore_parts.extend(other.underscore_parts);
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
            && self.hyphenated.is_empty()
            && self.filenames.is_empty()
            && self.underscore_parts.is_empty()
    }

    /// Total number of extracted tokens across all categories.
    pub fn token_count(&self) -> usize {
        self.words.len()
            + self.hyphenated.len()
            + self.filenames.len()
            + self.underscore_parts.len()
    }
}

/// Compiled pattern tables, built once and shared by all workers.
pub struct Extractor {
    word: Regex,
    hyphenated: Regex,
    filename: Regex,
    extensions: ExtensionSet,
}

impl Extractor {
    /// Build with the compiled-in default extension set.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_extensions(extensions::default_extension_set())
    }

    /// Build with a caller-supplied extension set.
    pub fn with_extensions(extensions: ExtensionSet) -> anyhow::Result<Self> {
        Ok(Self {
            word: Regex::new(r"\b\w+\b")?,
            hyphenated: Regex::new(r"\b\w+(?:-\w+)+\b")?,
            // Extension membership is checked against the hash set, not
            // baked into the pattern.
            filename: Regex::new(r"\b\w+(?:-\w+)*\.(\w+)\b")?,
            extensions,
        })
    }

    /// Extract all token categories from one chunk of text.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        for m in self.word.find_iter(text) {
            let word = m.as_str();
            if word.contains('_') {
                for part in word.split('_').filter(|p| !p.is_empty()) {
                    result.underscore_parts.push(part.to_string());
                }
            }
            result.words.push(word.to_string());
        }

        for m in self.hyphenated.find_iter(text) {
            result.hyphenated.push(m.as_str().to_string());
        }

        // Manual scan instead of captures_iter: when a candidate's
        // extension is not recognized, rescan from just past its first dot
        // so a trailing name.ext inside a multi-dot token (jquery.min.js)
        // is still seen.
        let mut at = 0;
        while let Some(caps) = self.filename.captures_at(text, at) {
            let Some(m) = caps.get(0) else { break };
            let ext = &caps[1];
            if extensions::is_recognized(&self.extensions, ext) {
                result.filenames.push(m.as_str().to_string());
                at = m.end();
            } else {
                at = match text[m.start()..m.end()].find('.') {
                    Some(dot) => m.start() + dot + 1,
                    None => m.end(),
                };
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new().unwrap()
    }

    #[test]
    fn test_spec_example() {
        let result = extractor().extract("Fetch report-v2.pdf from user_data now");

        for expected in ["Fetch", "report", "v2", "pdf", "from", "user_data", "now"] {
            assert!(
                result.words.iter().any(|w| w == expected),
                "missing word: {expected}"
            );
        }
        assert_eq!(result.hyphenated, vec!["report-v2"]);
        assert_eq!(result.filenames, vec!["report-v2.pdf"]);
        assert_eq!(result.underscore_parts, vec!["user", "data"]);
    }

    #[test]
    fn test_empty_input() {
        let result = extractor().extract("");
        assert!(result.is_empty());
    }

    #[test]
    fn test_punctuation_not_included() {
        let result = extractor().extract("(hello), [world]! admin.php?x=1");
        assert!(result.words.contains(&"hello".to_string()));
        assert!(result.words.contains(&"world".to_string()));
        assert!(result.filenames.contains(&"admin.php".to_string()));
        assert!(!result.words.iter().any(|w| w.contains('(') || w.contains('!')));
    }

    #[test]
    fn test_unknown_extension_excluded() {
        let result = extractor().extract("see notes.quux and backup.tar here");
        assert_eq!(result.filenames, vec!["backup.tar"]);
    }

    #[test]
    fn test_multidot_filename_suffix_recognized() {
        // The first name.ext candidate has an unrecognized extension; the
        // suffix filename after its dot must still be found
        let result = extractor().extract("download jquery.min.js and x.foo.pdf here");
        assert_eq!(result.filenames, vec!["min.js", "foo.pdf"]);
    }

    #[test]
    fn test_multidot_filename_first_match_wins() {
        // When the first candidate's extension is recognized, the scan
        // resumes after it, as with the non-overlapping original
        let result = extractor().extract("grab archive.tar.gz now");
        assert_eq!(result.filenames, vec!["archive.tar"]);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let result = extractor().extract("REPORT.PDF image.JpG");
        assert_eq!(result.filenames, vec!["REPORT.PDF", "image.JpG"]);
    }

    #[test]
    fn test_hyphenated_requires_hyphen() {
        let result = extractor().extract("plain multi-part-token word");
        assert_eq!(result.hyphenated, vec!["multi-part-token"]);
    }

    #[test]
    fn test_hyphenated_segments_are_words() {
        let result = extractor().extract("a-b c-d-e plain");
        for token in &result.hyphenated {
            assert!(token.contains('-'));
            for segment in token.split('-') {
                assert!(!segment.is_empty());
                assert!(segment.chars().all(|c| c.is_alphanumeric() || c == '_'));
            }
        }
    }

    #[test]
    fn test_double_hyphen_not_joined() {
        // "--" breaks the single-hyphen join rule
        let result = extractor().extract("foo--bar baz-qux");
        assert_eq!(result.hyphenated, vec!["baz-qux"]);
    }

    #[test]
    fn test_underscore_split_drops_empty_parts() {
        let result = extractor().extract("_leading trailing_ a__b");
        assert!(result.underscore_parts.contains(&"leading".to_string()));
        assert!(result.underscore_parts.contains(&"trailing".to_string()));
        assert!(result.underscore_parts.contains(&"a".to_string()));
        assert!(result.underscore_parts.contains(&"b".to_string()));
        assert!(!result.underscore_parts.iter().any(|p| p.is_empty()));
    }

    #[test]
    fn test_case_preserved() {
        let result = extractor().extract("AdminPanel");
        assert_eq!(result.words, vec!["AdminPanel"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let result = extractor().extract("admin admin admin");
        assert_eq!(result.words.len(), 3);
    }

    #[test]
    fn test_extend_preserves_order() {
        let ex = extractor();
        let mut acc = ex.extract("first chunk");
        acc.extend(ex.extract("second chunk"));
        assert_eq!(acc.words, vec!["first", "chunk", "second", "chunk"]);
    }

    #[test]
    fn test_token_count() {
        let result = extractor().extract("one two-three four.pdf a_b");
        // words: one, two, three, four, pdf, a_b (6)
        // hyphenated: two-three (1), filenames: four.pdf (1), parts: a, b (2)
        assert_eq!(result.token_count(), 10);
    }
}
