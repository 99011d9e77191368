use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Characters that split a normalized line into tokens. Hyphen and underscore are
/// not delimiters: `pre-procesar` and `token_delimiters` are single tokens.
pub const DEFAULT_TOKEN_DELIMITERS: &str = " \r\n\x0B\x0C.,:;!¡¿?\\/()[]{}\t|\"#*+=";
pub const DEFAULT_PLAIN_TEXT_EXTENSIONS: &str = "txt|java|c|cpp|py";
pub const DEFAULT_INDEX_FILENAME: &str = "CRAWLERINDEX.idx";

/// Extractor used for a file extension that is not plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Markup,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Bincode,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub token_delimiters: String,
    /// Regex matched against the whole (lowercased) extension.
    pub plain_text_extensions: String,
    pub extractors: BTreeMap<String, ExtractorKind>,
    pub index_filename: String,
    /// Where the index file goes. When unset it is placed beside the root.
    pub index_dir: Option<PathBuf>,
    pub codec: CodecKind,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        let extractors = ["html", "htm", "xhtml", "xml"]
            .into_iter()
            .map(|ext| (ext.to_string(), ExtractorKind::Markup))
            .collect();
        Self {
            token_delimiters: DEFAULT_TOKEN_DELIMITERS.to_string(),
            plain_text_extensions: DEFAULT_PLAIN_TEXT_EXTENSIONS.to_string(),
            extractors,
            index_filename: DEFAULT_INDEX_FILENAME.to_string(),
            index_dir: None,
            codec: CodecKind::default(),
        }
    }
}

impl CrawlerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn plain_text_matcher(&self) -> Result<Regex> {
        Regex::new(&format!("^(?:{})$", self.plain_text_extensions))
            .map_err(|e| Error::Config(format!("plain_text_extensions: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_delimiters.is_empty() {
            return Err(Error::Config("token_delimiters must not be empty".into()));
        }
        if self.index_filename.trim().is_empty() {
            return Err(Error::Config("index_filename must not be empty".into()));
        }
        self.plain_text_matcher().map(|_| ())
    }
}
