use crate::config::{CodecKind, CrawlerConfig};
use crate::error::{Error, Result};
use crate::InvertedIndex;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const INDEX_MAGIC: &str = "PCCRAWLER";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub magic: String,
    pub version: u32,
    pub created_at: String,
    pub num_docs: u32,
    pub num_terms: u32,
}

impl MetaFile {
    pub fn describe(index: &InvertedIndex) -> Self {
        Self {
            magic: INDEX_MAGIC.to_string(),
            version: FORMAT_VERSION,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into()),
            num_docs: index.catalog().len() as u32,
            num_terms: index.num_terms() as u32,
        }
    }

    fn check(&self, index: &InvertedIndex) -> std::result::Result<(), String> {
        if self.magic != INDEX_MAGIC {
            return Err(format!("unexpected magic {:?}", self.magic));
        }
        if self.version != FORMAT_VERSION {
            return Err(format!("unsupported format version {}", self.version));
        }
        if self.num_docs as usize != index.catalog().len() || self.num_terms as usize != index.num_terms() {
            return Err("header counts do not match payload".into());
        }
        Ok(())
    }
}

/// On-disk layout: header and index travel together as one value.
#[derive(Serialize, Deserialize)]
struct IndexFile<M, T> {
    meta: M,
    index: T,
}

/// Marshals an index to and from a byte stream.
pub trait IndexCodec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, meta: &MetaFile, index: &InvertedIndex, out: &mut dyn Write) -> std::result::Result<(), String>;
    fn decode(&self, input: &mut dyn Read) -> std::result::Result<(MetaFile, InvertedIndex), String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl IndexCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode(&self, meta: &MetaFile, index: &InvertedIndex, out: &mut dyn Write) -> std::result::Result<(), String> {
        let bytes = bincode::DefaultOptions::new()
            .serialize(&IndexFile { meta, index })
            .map_err(|e| e.to_string())?;
        out.write_all(&bytes).map_err(|e| e.to_string())
    }

    fn decode(&self, input: &mut dyn Read) -> std::result::Result<(MetaFile, InvertedIndex), String> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf).map_err(|e| e.to_string())?;
        // a corrupt length prefix can never ask for more than the file holds
        let file: IndexFile<MetaFile, InvertedIndex> = bincode::DefaultOptions::new()
            .with_limit(buf.len() as u64)
            .deserialize(&buf)
            .map_err(|e| e.to_string())?;
        Ok((file.meta, file.index))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl IndexCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, meta: &MetaFile, index: &InvertedIndex, out: &mut dyn Write) -> std::result::Result<(), String> {
        serde_json::to_writer_pretty(out, &IndexFile { meta, index }).map_err(|e| e.to_string())
    }

    fn decode(&self, input: &mut dyn Read) -> std::result::Result<(MetaFile, InvertedIndex), String> {
        let file: IndexFile<MetaFile, InvertedIndex> = serde_json::from_reader(input).map_err(|e| e.to_string())?;
        Ok((file.meta, file.index))
    }
}

pub fn codec_for(kind: CodecKind) -> Box<dyn IndexCodec> {
    match kind {
        CodecKind::Bincode => Box::new(BincodeCodec),
        CodecKind::Json => Box::new(JsonCodec),
    }
}

/// Where the index for `root` lives: `config.index_dir` if set, otherwise the
/// root directory itself, or the executable's directory when the root is a file.
pub fn index_location(root: &Path, config: &CrawlerConfig) -> Result<PathBuf> {
    let dir = match &config.index_dir {
        Some(dir) => dir.clone(),
        None if root.is_dir() => root.to_path_buf(),
        None => {
            let exe = std::env::current_exe().map_err(|e| Error::io(root, e))?;
            exe.parent().map(Path::to_path_buf).unwrap_or_default()
        }
    };
    Ok(dir.join(&config.index_filename))
}

/// Writes `index` to `path`, replacing any previous file only once the new one is complete.
pub fn save(codec: &dyn IndexCodec, index: &InvertedIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let meta = MetaFile::describe(index);
    {
        let f = File::create(&tmp_path).map_err(|e| Error::io(&tmp_path, e))?;
        let mut w = BufWriter::new(f);
        codec
            .encode(&meta, index, &mut w)
            .map_err(|reason| Error::Io { path: tmp_path.clone(), source: std::io::Error::other(reason) })?;
        w.flush().map_err(|e| Error::io(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), codec = codec.name(), docs = meta.num_docs, terms = meta.num_terms, "saved inverted index");
    Ok(())
}

pub fn load(codec: &dyn IndexCodec, path: &Path) -> Result<InvertedIndex> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(f);
    let (meta, index) = codec.decode(&mut reader).map_err(|reason| Error::corrupt(path, reason))?;
    meta.check(&index).map_err(|reason| Error::corrupt(path, reason))?;
    index.validate().map_err(|reason| Error::corrupt(path, reason))?;
    tracing::info!(path = %path.display(), created_at = %meta.created_at, docs = meta.num_docs, terms = meta.num_terms, "loaded inverted index");
    Ok(index)
}

/// Like [`load`], but any failure is logged and an empty index returned instead.
pub fn load_or_empty(codec: &dyn IndexCodec, path: &Path) -> InvertedIndex {
    match load(codec, path) {
        Ok(index) => index,
        Err(e) => {
            tracing::error!(error = %e, "could not load inverted index, continuing with an empty one");
            InvertedIndex::empty()
        }
    }
}
