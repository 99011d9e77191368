//! Text extraction for the documents found during a crawl.
//!
//! Plain text is streamed line by line. Every other format goes through a
//! [`ContentExtractor`] chosen by file extension, with [`GenericExtractor`] as the
//! last resort.

use crate::config::{CrawlerConfig, ExtractorKind};
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::bytes::Regex;
use scraper::{Html, Node};
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

lazy_static! {
    static ref PRINTABLE_RUN: Regex = Regex::new(r"(?-u)[\x20-\x7E\t]{4,}").expect("valid regex");
}

pub trait ContentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Calls `f` for every line of `source`, an opened `path`. Invalid UTF-8 is
    /// replaced rather than rejected so one bad byte does not cost the rest of the file.
    pub fn read_lines<R: Read, F: FnMut(&str)>(&self, path: &Path, source: R, mut f: F) -> Result<()> {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).map_err(|e| Error::io(path, e))?;
            if n == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            f(line.trim_end_matches(['\n', '\r']));
        }
        Ok(())
    }
}

impl ContentExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// HTML and XML: the document's text nodes, minus `script` and `style` bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupExtractor;

impl ContentExtractor for MarkupExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let source = String::from_utf8_lossy(&bytes);
        let document = Html::parse_document(&source);
        let mut out = String::new();
        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else { continue };
            let in_code = node
                .parent()
                .and_then(|p| p.value().as_element())
                .map_or(false, |el| matches!(el.name(), "script" | "style"));
            if in_code {
                continue;
            }
            let text: &str = text;
            let text = text.trim();
            if !text.is_empty() {
                out.push_str(text);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

/// Best effort for unknown formats: the whole file if it is UTF-8, otherwise
/// every printable ASCII run of at least four bytes (the `strings` heuristic).
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericExtractor;

impl ContentExtractor for GenericExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                let bytes = e.into_bytes();
                let mut out = String::new();
                for m in PRINTABLE_RUN.find_iter(&bytes) {
                    // the pattern only matches ASCII
                    out.push_str(&String::from_utf8_lossy(m.as_bytes()));
                    out.push('\n');
                }
                if out.is_empty() {
                    return Err(Error::Extraction {
                        path: path.to_path_buf(),
                        reason: "binary content without printable text".into(),
                    });
                }
                Ok(out)
            }
        }
    }
}

/// Extension -> extractor mapping, resolved once when the crawler is configured.
#[derive(Clone)]
pub struct ExtractorRegistry {
    by_extension: HashMap<String, Arc<dyn ContentExtractor>>,
    fallback: Arc<dyn ContentExtractor>,
}

impl ExtractorRegistry {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        let markup: Arc<dyn ContentExtractor> = Arc::new(MarkupExtractor);
        let generic: Arc<dyn ContentExtractor> = Arc::new(GenericExtractor);
        let by_extension = config
            .extractors
            .iter()
            .map(|(ext, kind)| {
                let extractor = match kind {
                    ExtractorKind::Markup => markup.clone(),
                    ExtractorKind::Generic => generic.clone(),
                };
                (ext.to_ascii_lowercase(), extractor)
            })
            .collect();
        Self { by_extension, fallback: generic }
    }

    pub fn register(&mut self, extension: &str, extractor: Arc<dyn ContentExtractor>) {
        self.by_extension.insert(extension.to_ascii_lowercase(), extractor);
    }

    pub fn resolve(&self, extension: &str) -> Option<&dyn ContentExtractor> {
        self.by_extension.get(extension).map(|e| e.as_ref())
    }

    pub fn fallback(&self) -> &dyn ContentExtractor {
        self.fallback.as_ref()
    }
}
