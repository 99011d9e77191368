pub mod catalog;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod index;
pub mod persist;
pub mod query;
pub mod thesaurus;
pub mod tokenizer;

pub use catalog::DocumentCatalog;
pub use config::{CodecKind, CrawlerConfig, ExtractorKind};
pub use crawler::Crawler;
pub use error::{Error, Result};
pub use index::{DocId, IndexBuilder, IndexStats, InvertedIndex, Occurrences};
pub use query::{query, Hit, QueryOutcome, RankedResults};
