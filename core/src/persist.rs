use crate::{DocId, InvertedIndex};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn index_json(&self) -> PathBuf { self.root.join("inverted_index.json") }
    pub fn index_text(&self) -> PathBuf { self.root.join("inverted_index.txt") }
}

/// Load a `{ term: [doc_id, ...] }` JSON file into an index.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening index {}", path.display()))?;
    let raw: BTreeMap<String, Vec<DocId>> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing index {}", path.display()))?;
    let index = InvertedIndex::from_postings(raw);
    tracing::info!(path = %path.display(), num_terms = index.num_terms(), num_docs = index.num_docs(), "loaded index");
    Ok(index)
}

/// Terms in lexical order with ascending posting lists.
fn sorted_postings(index: &InvertedIndex) -> BTreeMap<&str, Vec<DocId>> {
    index
        .terms()
        .map(|term| {
            let mut docs: Vec<DocId> = index.postings(term).into_iter().flatten().copied().collect();
            docs.sort_unstable();
            (term, docs)
        })
        .collect()
}

pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &sorted_postings(index))?;
    w.flush()?;
    Ok(())
}

/// Human-readable dump, one `term: 1 5 10` line per term.
pub fn save_index_text<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (term, docs) in sorted_postings(index) {
        let ids: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        writeln!(w, "{}: {}", term, ids.join(" "))?;
    }
    w.flush()?;
    Ok(())
}

/// Parse the crawler's page listing, one `N<TAB>url` line per fetched page.
pub fn parse_doc_urls(text: &str) -> Result<HashMap<DocId, String>> {
    let mut urls = HashMap::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() { continue; }
        let (num, url) = line
            .split_once(char::is_whitespace)
            .with_context(|| format!("line {}: expected `<doc id> <url>`", lineno + 1))?;
        let doc_id: DocId = num.parse().with_context(|| format!("line {}: bad doc id {num:?}", lineno + 1))?;
        urls.insert(doc_id, url.trim().to_string());
    }
    Ok(urls)
}

pub fn load_doc_urls<P: AsRef<Path>>(path: P) -> Result<HashMap<DocId, String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let urls = parse_doc_urls(&text).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(path = %path.display(), pages = urls.len(), "loaded page urls");
    Ok(urls)
}
