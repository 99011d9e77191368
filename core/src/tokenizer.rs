use unicode_normalization::UnicodeNormalization;

/// Canonical decomposition (NFD), drop everything outside ASCII, lowercase.
///
/// Accented letters decompose into a base letter plus a combining mark, and the
/// mark is then discarded, so `Canción` becomes `cancion`. Characters with no
/// ASCII base (`ß`, CJK, emoji) disappear entirely.
pub fn normalize(text: &str) -> String {
    let mut out: String = text.nfd().filter(char::is_ascii).collect();
    out.make_ascii_lowercase();
    out
}

/// Splits normalized lines on a fixed delimiter set.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    delimiters: Vec<char>,
}

impl Tokenizer {
    pub fn new(delimiters: &str) -> Self {
        let mut delimiters: Vec<char> = delimiters.chars().collect();
        delimiters.sort_unstable();
        delimiters.dedup();
        Self { delimiters }
    }

    #[inline]
    pub fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.binary_search(&c).is_ok()
    }

    /// Tokens of `line` in order. Runs of delimiters never produce empty tokens.
    pub fn tokens<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        line.split(move |c: char| self.is_delimiter(c)).filter(|t| !t.is_empty())
    }

    /// Normalize then tokenize, collecting owned terms.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        self.tokens(&normalized).map(str::to_owned).collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOKEN_DELIMITERS)
    }
}
