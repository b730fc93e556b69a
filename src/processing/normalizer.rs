//! Text normalization
//!
//! Two strategies over one concept: a regex cleaning pass used when
//! scanning request text on the fly, and a token pass (stop-word removal
//! plus lemmatization) used to pre-process corpus documents before
//! vocabulary fitting. Both lower-case and are pure functions of their
//! input.

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStrategy {
    /// Regex-based cleaning: strip contact details and punctuation,
    /// collapse whitespace.
    Clean,
    /// Cleaning followed by tokenization, stop-word removal, and
    /// lemmatization; tokens rejoined with single spaces.
    Lemmatize,
}

pub struct TextNormalizer {
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
    www_regex: Regex,
    special_regex: Regex,
    whitespace_regex: Regex,
    stop_words: HashSet<&'static str>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"\S+@\S+").expect("Invalid email regex");
        let phone_regex =
            Regex::new(r"\(?\+?[0-9][0-9\s\-()]{5,}[0-9]").expect("Invalid phone regex");
        let url_regex = Regex::new(r"https?://\S+").expect("Invalid URL regex");
        let www_regex = Regex::new(r"www\.\S+").expect("Invalid www regex");
        let special_regex = Regex::new(r#"[•\[\]{}()+\-=_|\\^~`"':;,<>/?]"#)
            .expect("Invalid special character regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            email_regex,
            phone_regex,
            url_regex,
            www_regex,
            special_regex,
            whitespace_regex,
            stop_words: Self::stop_words(),
        }
    }

    pub fn normalize(&self, text: &str, strategy: NormalizeStrategy) -> String {
        match strategy {
            NormalizeStrategy::Clean => self.clean(text),
            NormalizeStrategy::Lemmatize => self.lemmatize(text),
        }
    }

    /// Lower-case, strip emails / URLs / phone-like digit groups,
    /// replace special characters with spaces, collapse whitespace.
    /// Empty or whitespace-only input yields an empty string.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_lowercase();

        // URLs and emails carry the punctuation the special pass strips,
        // so they must go first or their fragments survive.
        cleaned = self.url_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.www_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.email_regex.replace_all(&cleaned, " ").to_string();

        // Punctuation to spaces before the phone pass: digit groups
        // separated by stripped punctuation still read as one number.
        cleaned = self.special_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.phone_regex.replace_all(&cleaned, " ").to_string();

        self.whitespace_regex.replace_all(&cleaned, " ").trim().to_string()
    }

    /// Clean, then tokenize into unicode words, reduce each token to a
    /// base form, and drop stop words. Lemmatization runs first so a
    /// token whose stem is a stop word is filtered too; the rejoined
    /// output re-normalizes to itself.
    pub fn lemmatize(&self, text: &str) -> String {
        let cleaned = self.clean(text);

        cleaned
            .unicode_words()
            .map(Self::lemma)
            .filter(|word| !self.stop_words.contains(word.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Suffix-stripping lemmatizer covering regular English plurals and
    /// inflections. Not a dictionary lemmatizer; the strategy seam keeps
    /// it swappable.
    fn lemma(word: &str) -> String {
        let n = word.len();
        if n <= 3 || word.chars().any(|c| c.is_numeric()) {
            return word.to_string();
        }

        if n > 4 && word.ends_with("ies") {
            return format!("{}y", &word[..n - 3]);
        }
        if word.ends_with("sses") {
            return word[..n - 2].to_string();
        }
        if n > 4 && (word.ends_with("ches") || word.ends_with("shes") || word.ends_with("xes")) {
            return word[..n - 2].to_string();
        }
        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            return word[..n - 1].to_string();
        }

        word.to_string()
    }

    fn stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "did", "do",
            "does", "for", "from", "had", "has", "have", "he", "her", "his", "how", "i", "if",
            "in", "into", "is", "it", "its", "me", "more", "most", "my", "no", "not", "of", "on",
            "or", "our", "out", "she", "so", "some", "such", "than", "that", "the", "their",
            "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
            "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
            "while", "who", "why", "will", "with", "would", "you", "your",
        ]
        .into_iter()
        .collect()
    }
}
