use crate::DocId;
use serde::{Deserialize, Serialize};

/// Append-only lookup table from document id to path. The id is the position in
/// the table, so ids are dense and never reassigned. Paths are not deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCatalog {
    documents: Vec<String>,
}

impl DocumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` and returns its id, or `None` for an empty path.
    pub fn add(&mut self, path: &str) -> Option<DocId> {
        if path.is_empty() {
            return None;
        }
        let id = DocId::try_from(self.documents.len()).ok()?;
        self.documents.push(path.to_owned());
        Some(id)
    }

    pub fn lookup(&self, id: DocId) -> Option<&str> {
        self.documents.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str)> {
        self.documents.iter().enumerate().map(|(i, p)| (i as DocId, p.as_str()))
    }
}
