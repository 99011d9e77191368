use pccrawler_core::extract::ContentExtractor;
use pccrawler_core::persist::{self, JsonCodec};
use pccrawler_core::{query, CodecKind, Crawler, CrawlerConfig, Error, QueryOutcome};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write_thesauri(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let thesaurus = dir.join("thesaurus.txt");
    let stopwords = dir.join("stopwords.txt");
    fs::write(
        &thesaurus,
        "# tesauro de prueba\ncasa;hogar;vivienda\nrojo;colorado\nperro,can\nárbol;planta leñosa\nel\n",
    )
    .unwrap();
    fs::write(&stopwords, "el la los las de\n").unwrap();
    (thesaurus, stopwords)
}

fn crawler(config: CrawlerConfig) -> Crawler {
    let aux = tempdir().unwrap();
    let (t, s) = write_thesauri(aux.path());
    let mut c = Crawler::new(config).unwrap();
    c.load_thesauri(&t, &s).unwrap();
    c
}

fn corpus(root: &Path) {
    fs::create_dir_all(root.join("b/inner")).unwrap();
    fs::write(root.join("a.txt"), "La casa roja.\nEl perro y la casa, el perro.\n").unwrap();
    fs::write(root.join("b/c.java"), "// casa\nclass Casa { Perro perro; }\n").unwrap();
    fs::write(root.join("b/inner/d.py"), "arbol = \"Árbol\" # casa\n").unwrap();
    fs::write(root.join("e.html"), "<html><body><h1>Rojo</h1><script>perro()</script><p>hogar</p></body></html>").unwrap();
    fs::write(root.join("f.dat"), [0u8, 159, 146, 150, b' ', b'c', b'a', b's', b'a', b' ', b'r', b'o', b'j', b'o', 0]).unwrap();
}

fn file_names(index: &pccrawler_core::InvertedIndex) -> Vec<String> {
    index
        .catalog()
        .iter()
        .map(|(_, p)| Path::new(p).file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn depth_first_name_ordered_ids() {
    let root = tempdir().unwrap();
    corpus(root.path());
    let index = crawler(CrawlerConfig::default()).build(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["a.txt", "c.java", "d.py", "e.html", "f.dat"]);
}

#[test]
fn frequencies_and_filtering() {
    let root = tempdir().unwrap();
    corpus(root.path());
    let index = crawler(CrawlerConfig::default()).build(root.path()).unwrap();

    for (_, occ) in index.terms() {
        let sum: u64 = occ.per_document().values().map(|&f| u64::from(f)).sum();
        assert_eq!(occ.global_frequency(), sum);
    }
    for stop in ["el", "la", "de"] {
        assert!(!index.contains(stop), "stopword {stop} was indexed");
    }

    let casa = index.get("casa").unwrap();
    assert_eq!(casa.local_frequency(0), Some(2));
    assert_eq!(casa.local_frequency(1), Some(2));
    assert_eq!(casa.local_frequency(2), Some(1));
    assert_eq!(casa.local_frequency(3), None);
    assert_eq!(casa.local_frequency(4), Some(1));
    assert_eq!(casa.global_frequency(), 6);

    // script bodies are not text
    assert_eq!(index.get("perro").unwrap().local_frequency(3), None);
    assert_eq!(index.get("hogar").unwrap().local_frequency(3), Some(1));
    assert_eq!(index.get("arbol").unwrap().local_frequency(2), Some(2));
    assert!(!index.contains("roja"));
}

#[test]
fn rebuild_does_not_index_its_own_file() {
    let root = tempdir().unwrap();
    corpus(root.path());
    let c = crawler(CrawlerConfig::default());
    let first = c.build(root.path()).unwrap();
    assert!(root.path().join("CRAWLERINDEX.idx").exists());
    let second = c.build(root.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn persisted_index_round_trips() {
    let root = tempdir().unwrap();
    corpus(root.path());
    for codec in [CodecKind::Bincode, CodecKind::Json] {
        let cfg = CrawlerConfig { codec, ..Default::default() };
        let c = crawler(cfg);
        let built = c.build(root.path()).unwrap();
        let loaded = c.load(root.path());
        assert_eq!(loaded, built);
        assert_eq!(file_names(&loaded), file_names(&built));
    }
}

#[test]
fn loading_without_thesauri_is_allowed() {
    let root = tempdir().unwrap();
    corpus(root.path());
    let built = crawler(CrawlerConfig::default()).build(root.path()).unwrap();
    let reader = Crawler::new(CrawlerConfig::default()).unwrap();
    assert_eq!(reader.load(root.path()), built);
}

#[test]
fn corrupt_or_missing_index_loads_empty() {
    let root = tempdir().unwrap();
    let c = Crawler::new(CrawlerConfig::default()).unwrap();
    assert!(c.load(root.path()).is_empty());
    fs::write(root.path().join("CRAWLERINDEX.idx"), b"not an index at all").unwrap();
    assert!(c.load(root.path()).is_empty());
    let err = persist::load(&JsonCodec, &root.path().join("CRAWLERINDEX.idx")).unwrap_err();
    assert!(matches!(err, Error::CorruptIndex { .. }));
}

#[test]
fn ties_are_all_reported_in_discovery_order() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("1.txt"), "perro").unwrap();
    fs::write(root.path().join("2.txt"), "perro casa casa").unwrap();
    fs::write(root.path().join("3.txt"), "perro").unwrap();
    let index = crawler(CrawlerConfig::default()).build_in_memory(root.path()).unwrap();

    let QueryOutcome::Ranked(r) = query(&index, "Perro") else { panic!("expected hits") };
    assert_eq!(r.global_frequency, 3);
    let ids: Vec<u32> = r.hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(r.hits.iter().all(|h| h.local_frequency == 1));

    assert!(matches!(query(&index, "gato"), QueryOutcome::NoResults { .. }));
}

#[test]
fn thesaurus_files_must_exist() {
    let aux = tempdir().unwrap();
    let (t, _) = write_thesauri(aux.path());
    let mut c = Crawler::new(CrawlerConfig::default()).unwrap();
    assert!(c.load_thesauri(&t, &aux.path().join("missing.txt")).is_err());
    assert!(!c.filter().is_loaded());
    assert!(matches!(c.build(aux.path()), Err(Error::ThesauriNotLoaded)));
}

#[test]
fn custom_delimiters_and_extensions() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("notes.md"), "casa-perro casa").unwrap();
    let cfg = CrawlerConfig {
        token_delimiters: " -".into(),
        plain_text_extensions: "md".into(),
        ..Default::default()
    };
    let index = crawler(cfg).build_in_memory(root.path()).unwrap();
    assert_eq!(index.get("casa").unwrap().global_frequency(), 2);
    assert_eq!(index.get("perro").unwrap().global_frequency(), 1);
}

struct BrokenExtractor;

impl ContentExtractor for BrokenExtractor {
    fn extract(&self, path: &Path) -> pccrawler_core::Result<String> {
        Err(Error::Extraction { path: path.to_path_buf(), reason: "unsupported layout".into() })
    }
}

#[test]
fn failing_extractor_falls_back_to_generic() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("informe.pdf"), "casa roja, rojo").unwrap();
    let c = crawler(CrawlerConfig::default()).with_extractor("pdf", Arc::new(BrokenExtractor));
    let index = c.build_in_memory(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["informe.pdf"]);
    assert_eq!(index.get("casa").unwrap().local_frequency(0), Some(1));
    assert_eq!(index.get("rojo").unwrap().local_frequency(0), Some(1));
}

#[test]
fn document_without_text_keeps_its_id() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("a.txt"), "casa").unwrap();
    fs::write(root.path().join("ruido.bin"), [0xffu8, 0x00, 0x80, 0x01]).unwrap();
    fs::write(root.path().join("z.txt"), "perro").unwrap();
    let index = crawler(CrawlerConfig::default()).build_in_memory(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["a.txt", "ruido.bin", "z.txt"]);
    assert_eq!(index.num_terms(), 2);
    assert!(index.terms().all(|(_, occ)| occ.local_frequency(1).is_none()));
    assert_eq!(index.get("perro").unwrap().local_frequency(2), Some(1));
}

#[cfg(unix)]
#[test]
fn dangling_link_does_not_stop_the_build() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("a.txt"), "casa").unwrap();
    std::os::unix::fs::symlink(root.path().join("nowhere.txt"), root.path().join("b.txt")).unwrap();
    fs::write(root.path().join("c.txt"), "casa perro").unwrap();
    let index = crawler(CrawlerConfig::default()).build_in_memory(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["a.txt", "c.txt"]);
    assert_eq!(index.get("casa").unwrap().global_frequency(), 2);
}

#[cfg(unix)]
#[test]
fn symlink_cycle_is_walked_once() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("sub")).unwrap();
    fs::write(root.path().join("a.txt"), "casa").unwrap();
    fs::write(root.path().join("sub/b.txt"), "casa").unwrap();
    std::os::unix::fs::symlink(root.path(), root.path().join("sub/loop")).unwrap();
    let index = crawler(CrawlerConfig::default()).build_in_memory(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["a.txt", "b.txt"]);
    assert_eq!(index.get("casa").unwrap().global_frequency(), 2);
}

#[cfg(unix)]
#[test]
fn unreadable_file_gets_no_id() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempdir().unwrap();
    fs::write(root.path().join("a.txt"), "casa").unwrap();
    let locked = root.path().join("b.txt");
    fs::write(&locked, "casa").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // running privileged, mode bits are not enforced
        return;
    }
    let index = crawler(CrawlerConfig::default()).build_in_memory(root.path()).unwrap();
    assert_eq!(file_names(&index), vec!["a.txt"]);
    assert_eq!(index.get("casa").unwrap().global_frequency(), 1);
}
