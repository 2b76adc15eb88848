use lazy_static::lazy_static;
use regex::Regex;
use rsmorphy::prelude::*;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\p{L}+").expect("valid regex");
    static ref MARKUP_RE: Regex = Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<[^>]*>").expect("valid regex");
    static ref DIGITS_RE: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "и","в","не","на","с","что","он","как","а","то","для","это",
            "но","я","она","мы","вы","они","от","до","же","ли","у","о",
            "со","за","над","под","без","про","при","по","или","бы","ещё",
            "её","их","его","меня","тебя","тому","этом","так","та","те",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Russian morphological analyzer reducing words to their dictionary form
/// (`цезарем` -> `цезарь`). Loading the dictionary is slow, so build one and
/// reuse it for every page.
pub struct Lemmatizer {
    morph: MorphAnalyzer,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self { morph: MorphAnalyzer::from_file(rsmorphy_dict_ru::DICT_PATH) }
    }

    /// Normal form of the most probable parse; the word itself when nothing parses.
    pub fn normal_form(&self, word: &str) -> String {
        self.morph
            .parse(word)
            .first()
            .map(|p| p.lex.get_normal_form(&self.morph).to_string())
            .unwrap_or_else(|| word.to_string())
    }

    /// Tokenize page text into index terms: NFKC, lowercase, letter runs of
    /// two or more characters, stopwords removed, lemmatized. Repeats are kept.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        WORD_RE
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() >= 2 && !is_stopword(w))
            .map(|w| self.normal_form(w).to_lowercase())
            .collect()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self { Self::new() }
}

/// Drop script/style blocks and tags, leaving the visible text.
pub fn strip_markup(html: &str) -> String {
    MARKUP_RE.replace_all(html, " ").into_owned()
}

/// Document number embedded in a file name: `page_001.tokens.txt` -> 1.
pub fn doc_num_from_name(file_name: &str) -> Option<u32> {
    DIGITS_RE.find(file_name).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = Lemmatizer::new().tokenize("Цезарь и Клеопатра");
        assert!(!t.iter().any(|w| w == "и"));
        assert_eq!(t.len(), 2);
        assert!(t.contains(&"цезарь".to_string()));
    }

    #[test]
    fn doc_numbers() {
        assert_eq!(doc_num_from_name("page_001.tokens.txt"), Some(1));
        assert_eq!(doc_num_from_name("index.txt"), None);
    }
}
