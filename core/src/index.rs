use crate::catalog::DocumentCatalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// Global and per-document frequency of one term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrences {
    global_frequency: u64,
    per_document: BTreeMap<DocId, u32>, // doc_id -> local frequency
}

impl Occurrences {
    /// A record already holding one occurrence in `doc_id`.
    pub fn first_in(doc_id: DocId) -> Self {
        let mut occ = Self::default();
        occ.record(doc_id);
        occ
    }

    pub fn record(&mut self, doc_id: DocId) {
        *self.per_document.entry(doc_id).or_insert(0) += 1;
        self.global_frequency += 1;
    }

    pub fn global_frequency(&self) -> u64 {
        self.global_frequency
    }

    pub fn per_document(&self) -> &BTreeMap<DocId, u32> {
        &self.per_document
    }

    pub fn local_frequency(&self, doc_id: DocId) -> Option<u32> {
        self.per_document.get(&doc_id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub occurrences: u64,
}

/// Read-only inverted index: term -> occurrences, plus the catalog that gives
/// the document ids their meaning. Only [`IndexBuilder::finish`] and the codecs
/// produce one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: BTreeMap<String, Occurrences>,
    catalog: DocumentCatalog,
}

impl InvertedIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&Occurrences> {
        self.terms.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &Occurrences)> {
        self.terms.iter().map(|(t, o)| (t.as_str(), o))
    }

    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.catalog.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.catalog.len(),
            terms: self.terms.len(),
            occurrences: self.terms.values().map(Occurrences::global_frequency).sum(),
        }
    }

    /// Structural checks run after decoding a persisted index.
    pub fn validate(&self) -> Result<(), String> {
        let num_docs = self.catalog.len();
        for (term, occ) in &self.terms {
            if term.is_empty() {
                return Err("empty term".into());
            }
            if occ.per_document.is_empty() {
                return Err(format!("term {term:?} has no documents"));
            }
            let mut sum = 0u64;
            for (&doc_id, &freq) in &occ.per_document {
                if doc_id as usize >= num_docs {
                    return Err(format!("term {term:?} references unknown document {doc_id}"));
                }
                if freq == 0 {
                    return Err(format!("term {term:?} has zero frequency in document {doc_id}"));
                }
                sum += u64::from(freq);
            }
            if sum != occ.global_frequency {
                return Err(format!(
                    "term {term:?} global frequency {} != sum of local frequencies {sum}",
                    occ.global_frequency
                ));
            }
        }
        Ok(())
    }
}

/// Mutable state of a build in progress.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    terms: BTreeMap<String, Occurrences>,
    catalog: DocumentCatalog,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, path: &str) -> Option<DocId> {
        self.catalog.add(path)
    }

    /// One occurrence of `term` in `doc_id`.
    pub fn record(&mut self, term: &str, doc_id: DocId) {
        match self.terms.get_mut(term) {
            Some(occ) => occ.record(doc_id),
            None => {
                self.terms.insert(term.to_owned(), Occurrences::first_in(doc_id));
            }
        }
    }

    pub fn finish(self) -> InvertedIndex {
        InvertedIndex { terms: self.terms, catalog: self.catalog }
    }
}
