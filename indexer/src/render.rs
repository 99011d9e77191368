use pccrawler_core::{InvertedIndex, QueryOutcome};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Output sink for query results and full index dumps.
pub trait ResultRenderer {
    fn render_query(&self, outcome: &QueryOutcome, out: &mut dyn Write) -> io::Result<()>;
    fn render_index(&self, index: &InvertedIndex, out: &mut dyn Write) -> io::Result<()>;
}

/// Last path component, or the whole path when there is none.
fn document_name(path: &str) -> &str {
    Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path)
}

pub struct ConsoleRenderer;

impl ResultRenderer for ConsoleRenderer {
    fn render_query(&self, outcome: &QueryOutcome, out: &mut dyn Write) -> io::Result<()> {
        match outcome {
            QueryOutcome::NoResults { .. } => writeln!(out, "\nNo results found"),
            QueryOutcome::Ranked(r) => {
                writeln!(out, "\n[Ranking criterion - descending frequency]")?;
                writeln!(out, "\n{} [{} TOTAL]", r.term, r.global_frequency)?;
                for hit in &r.hits {
                    writeln!(out, "  ├ {} => {} hit(s) [{}]", document_name(&hit.path), hit.local_frequency, hit.path)?;
                }
                Ok(())
            }
        }
    }

    fn render_index(&self, index: &InvertedIndex, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "\n--- INVERTED INDEX (Token, Global frequency, Partial frequencies) ---\n")?;
        for (term, occ) in index.terms() {
            writeln!(out, "{} [{} TOTAL]", term, occ.global_frequency())?;
            for (&doc_id, &freq) in occ.per_document() {
                let path = index.catalog().lookup(doc_id).unwrap_or_default();
                writeln!(out, "  ├ {} => {} hit(s) [{}]", document_name(path), freq, path)?;
            }
        }
        let stats = index.stats();
        writeln!(out, "\n{} document(s), {} term(s), {} occurrence(s)", stats.documents, stats.terms, stats.occurrences)
    }
}

#[derive(Serialize)]
struct JsonPosting<'a> {
    doc_id: u32,
    path: &'a str,
    frequency: u32,
}

#[derive(Serialize)]
struct JsonTerm<'a> {
    term: &'a str,
    global_frequency: u64,
    documents: Vec<JsonPosting<'a>>,
}

pub struct JsonRenderer;

impl ResultRenderer for JsonRenderer {
    fn render_query(&self, outcome: &QueryOutcome, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *out, outcome)?;
        writeln!(out)
    }

    fn render_index(&self, index: &InvertedIndex, out: &mut dyn Write) -> io::Result<()> {
        let terms: Vec<JsonTerm> = index
            .terms()
            .map(|(term, occ)| JsonTerm {
                term,
                global_frequency: occ.global_frequency(),
                documents: occ
                    .per_document()
                    .iter()
                    .map(|(&doc_id, &frequency)| JsonPosting {
                        doc_id,
                        path: index.catalog().lookup(doc_id).unwrap_or_default(),
                        frequency,
                    })
                    .collect(),
            })
            .collect();
        let body = serde_json::json!({ "stats": index.stats(), "terms": terms });
        serde_json::to_writer_pretty(&mut *out, &body)?;
        writeln!(out)
    }
}
