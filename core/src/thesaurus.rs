use crate::error::{Error, Result};
use crate::tokenizer::normalize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub type TermSet = BTreeSet<String>;

/// Parses a term set out of a text source.
pub trait DictionaryLoader {
    fn parse(&self, reader: &mut dyn BufRead) -> std::io::Result<TermSet>;

    fn load(&self, source: &Path) -> Result<TermSet> {
        let f = File::open(source).map_err(|e| Error::io(source, e))?;
        let mut reader = BufReader::new(f);
        self.parse(&mut reader).map_err(|e| Error::io(source, e))
    }
}

/// Allow-list: `word;synonym,other` lines with `#` comments.
/// Compound entries (anything with an inner space) are not indexable and get dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThesaurusLoader;

impl DictionaryLoader for ThesaurusLoader {
    fn parse(&self, reader: &mut dyn BufRead) -> std::io::Result<TermSet> {
        let mut terms = TermSet::new();
        for line in reader.lines() {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }
            let normalized = normalize(&line);
            for piece in normalized.split([';', ',']) {
                let piece = piece.trim();
                if piece.is_empty() || piece.contains(' ') {
                    continue;
                }
                terms.insert(piece.to_string());
            }
        }
        Ok(terms)
    }
}

/// Deny-list: one line of whitespace separated stopwords. Later lines are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StopwordLoader;

impl DictionaryLoader for StopwordLoader {
    fn parse(&self, reader: &mut dyn BufRead) -> std::io::Result<TermSet> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        Ok(normalize(&line).split_whitespace().map(str::to_owned).collect())
    }
}

/// Decides whether a token is indexed: in the thesaurus and not a stopword.
#[derive(Debug, Default, Clone)]
pub struct TermFilter {
    thesaurus: TermSet,
    stopwords: TermSet,
}

impl TermFilter {
    pub fn new(thesaurus: TermSet, stopwords: TermSet) -> Self {
        Self { thesaurus, stopwords }
    }

    pub fn is_loaded(&self) -> bool {
        !self.thesaurus.is_empty() && !self.stopwords.is_empty()
    }

    #[inline]
    pub fn accepts(&self, token: &str) -> bool {
        !self.stopwords.contains(token) && self.thesaurus.contains(token)
    }
}
