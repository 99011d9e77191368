use crate::tokenizer::normalize;
use crate::{DocId, InvertedIndex};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub path: String,
    pub local_frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedResults {
    pub term: String,
    pub global_frequency: u64,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome {
    NoResults { term: String },
    Ranked(RankedResults),
}

impl QueryOutcome {
    pub fn hits(&self) -> &[Hit] {
        match self {
            QueryOutcome::NoResults { .. } => &[],
            QueryOutcome::Ranked(r) => &r.hits,
        }
    }
}

/// Single term lookup. The raw term goes through the same normalization as
/// indexed text; hits are ordered by descending local frequency, then by
/// discovery order of the document.
pub fn query(index: &InvertedIndex, raw_term: &str) -> QueryOutcome {
    let term = normalize(raw_term).trim().to_string();
    let occ = match index.get(&term) {
        Some(occ) if !term.is_empty() => occ,
        _ => return QueryOutcome::NoResults { term },
    };

    let mut ranked: Vec<(DocId, u32)> = occ.per_document().iter().map(|(&d, &f)| (d, f)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let catalog = index.catalog();
    let hits = ranked
        .into_iter()
        .map(|(doc_id, local_frequency)| Hit {
            doc_id,
            path: catalog.lookup(doc_id).unwrap_or_default().to_string(),
            local_frequency,
        })
        .collect();

    QueryOutcome::Ranked(RankedResults { term, global_frequency: occ.global_frequency(), hits })
}
