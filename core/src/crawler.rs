//! Filesystem crawl that turns a directory hierarchy into an [`InvertedIndex`].
//!
//! The walk is depth-first and pre-order with siblings sorted by file name:
//! document ids of files in the same directory are contiguous, and the order
//! does not depend on how the platform lists entries.

use crate::config::CrawlerConfig;
use crate::error::{Error, Result};
use crate::extract::{ContentExtractor, ExtractorRegistry, PlainTextExtractor};
use crate::persist::{self, IndexCodec};
use crate::thesaurus::{DictionaryLoader, StopwordLoader, TermFilter, ThesaurusLoader};
use crate::tokenizer::{normalize, Tokenizer};
use crate::{DocId, IndexBuilder, InvertedIndex};
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub struct Crawler {
    config: CrawlerConfig,
    tokenizer: Tokenizer,
    plain_text: Regex,
    extractors: ExtractorRegistry,
    filter: TermFilter,
    codec: Box<dyn IndexCodec>,
    thesaurus_loader: Box<dyn DictionaryLoader>,
    stopword_loader: Box<dyn DictionaryLoader>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(&config.token_delimiters),
            plain_text: config.plain_text_matcher()?,
            extractors: ExtractorRegistry::from_config(&config),
            filter: TermFilter::default(),
            codec: persist::codec_for(config.codec),
            thesaurus_loader: Box::new(ThesaurusLoader),
            stopword_loader: Box::new(StopwordLoader),
            config,
        })
    }

    pub fn with_codec(mut self, codec: Box<dyn IndexCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_extractor(mut self, extension: &str, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractors.register(extension, extractor);
        self
    }

    pub fn with_loaders(mut self, thesaurus: Box<dyn DictionaryLoader>, stopwords: Box<dyn DictionaryLoader>) -> Self {
        self.thesaurus_loader = thesaurus;
        self.stopword_loader = stopwords;
        self
    }

    pub fn with_filter(mut self, filter: TermFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn filter(&self) -> &TermFilter {
        &self.filter
    }

    /// Loads both term sets. If either source fails, the current sets are kept
    /// and the error is returned.
    pub fn load_thesauri(&mut self, thesaurus: &Path, stopwords: &Path) -> Result<()> {
        let allow = self.thesaurus_loader.load(thesaurus)?;
        let deny = self.stopword_loader.load(stopwords)?;
        tracing::info!(thesaurus = allow.len(), stopwords = deny.len(), "loaded thesauri");
        self.filter = TermFilter::new(allow, deny);
        Ok(())
    }

    /// Where the index for `root` is written and read.
    pub fn index_path(&self, root: &Path) -> Result<PathBuf> {
        persist::index_location(root, &self.config)
    }

    /// Full rebuild of the index under `root`, saved to [`Crawler::index_path`].
    /// A failed save is logged; the built index is returned regardless.
    pub fn build(&self, root: &Path) -> Result<InvertedIndex> {
        let index = self.build_in_memory(root)?;
        match self.index_path(root).and_then(|path| persist::save(self.codec.as_ref(), &index, &path)) {
            Ok(()) => {}
            Err(e) => tracing::error!(error = %e, "could not save the built inverted index"),
        }
        Ok(index)
    }

    /// Same as [`Crawler::build`] without writing anything to disk.
    pub fn build_in_memory(&self, root: &Path) -> Result<InvertedIndex> {
        if !self.filter.is_loaded() {
            return Err(Error::ThesauriNotLoaded);
        }
        tracing::info!(root = %root.display(), "building inverted index");

        let mut builder = IndexBuilder::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    if e.loop_ancestor().is_some() {
                        tracing::debug!(path = %path, "symlink cycle, not descending");
                    } else {
                        tracing::warn!(path = %path, error = %e, "unable to read, skipping");
                    }
                    continue;
                }
            };
            if entry.file_type().is_file() {
                self.index_file(entry.path(), &mut builder);
            }
        }

        let index = builder.finish();
        let stats = index.stats();
        tracing::info!(docs = stats.documents, terms = stats.terms, occurrences = stats.occurrences, "inverted index built");
        Ok(index)
    }

    /// Loads the persisted index for `root`, or an empty one if it is missing or corrupt.
    pub fn load(&self, root: &Path) -> InvertedIndex {
        match self.index_path(root) {
            Ok(path) => persist::load_or_empty(self.codec.as_ref(), &path),
            Err(e) => {
                tracing::error!(error = %e, "could not locate the inverted index");
                InvertedIndex::empty()
            }
        }
    }

    fn index_file(&self, path: &Path, builder: &mut IndexBuilder) {
        if path.file_name().map_or(false, |n| n == self.config.index_filename.as_str()) {
            tracing::debug!(path = %path.display(), "skipping persisted index file");
            return;
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unable to read, skipping");
                return;
            }
        };
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let Some(doc_id) = builder.add_document(&absolute.to_string_lossy()) else {
            tracing::warn!(path = %path.display(), "could not register document");
            return;
        };

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if self.plain_text.is_match(&extension) {
            let res = PlainTextExtractor.read_lines(path, file, |line| self.index_text(line, doc_id, builder));
            match res {
                Ok(()) => tracing::debug!(path = %path.display(), doc_id, "indexed plain text document"),
                Err(e) => tracing::warn!(error = %e, "error while reading document, keeping what was read"),
            }
            return;
        }

        drop(file);
        match self.extract(path, &extension) {
            Some(text) => {
                for line in text.lines() {
                    self.index_text(line, doc_id, builder);
                }
                tracing::debug!(path = %path.display(), doc_id, "indexed extracted document");
            }
            None => tracing::warn!(path = %path.display(), doc_id, "no text could be extracted, document indexed without terms"),
        }
    }

    /// Specific extractor first, then the generic one.
    fn extract(&self, path: &Path, extension: &str) -> Option<String> {
        if let Some(extractor) = self.extractors.resolve(extension) {
            match extractor.extract(path) {
                Ok(text) => return Some(text),
                Err(e) => tracing::warn!(error = %e, "extractor failed, falling back to generic extraction"),
            }
        }
        match self.extractors.fallback().extract(path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "generic extraction failed");
                None
            }
        }
    }

    fn index_text(&self, text: &str, doc_id: DocId, builder: &mut IndexBuilder) {
        let normalized = normalize(text);
        for token in self.tokenizer.tokens(&normalized) {
            if self.filter.accepts(token) {
                builder.record(token, doc_id);
            }
        }
    }
}
