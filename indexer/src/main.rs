use anyhow::{bail, Context, Result};
use boolsearch_core::persist::{save_index, save_index_text, IndexPaths};
use boolsearch_core::tokenizer::{doc_num_from_name, strip_markup, Lemmatizer};
use boolsearch_core::{DocId, InvertedIndex};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const TOKENS_SUFFIX: &str = ".tokens.txt";

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Tokenize pages and build the boolean inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn downloaded pages into per-page token files
    Tokenize {
        /// Directory with page_NNN.html / .txt files
        #[arg(long, default_value = "./web_pages")]
        input: String,
        /// Directory for page_NNN.tokens.txt files
        #[arg(long, default_value = "./tokens_pages")]
        output: String,
    },
    /// Build inverted_index.json and inverted_index.txt from token files
    Build {
        /// Directory with page_NNN.tokens.txt files
        #[arg(long, default_value = "./tokens_pages")]
        input: String,
        /// Output index directory
        #[arg(long, default_value = "./index")]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { input, output } => tokenize_pages(Path::new(&input), Path::new(&output)),
        Commands::Build { input, output } => build_index(Path::new(&input), Path::new(&output)),
    }
}

fn collect_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().map(&keep).unwrap_or(false))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}

fn tokenize_pages(input: &Path, output: &Path) -> Result<()> {
    let pages = collect_files(input, |name| {
        let lower = name.to_lowercase();
        lower.ends_with(".html") || lower.ends_with(".htm") || lower.ends_with(".txt")
    });
    if pages.is_empty() {
        bail!("no pages found in {}", input.display());
    }
    fs::create_dir_all(output)?;
    let lemmatizer = Lemmatizer::new();
    tracing::debug!("loaded morphology dictionary");

    let mut seen: HashMap<u32, &Path> = HashMap::new();
    let mut total_terms = 0usize;
    for page in &pages {
        let name = file_name(page);
        let Some(num) = doc_num_from_name(name) else {
            tracing::warn!(file = name, "skipping page without a number");
            continue;
        };
        if let Some(prev) = seen.insert(num, page) {
            bail!("{} and {} both map to document {num}", prev.display(), page.display());
        }
        let raw = fs::read_to_string(page).with_context(|| format!("reading {}", page.display()))?;
        let terms: BTreeSet<String> = lemmatizer.tokenize(&strip_markup(&raw)).into_iter().collect();
        total_terms += terms.len();

        let mut body = String::new();
        for term in &terms {
            body.push_str(term);
            body.push('\n');
        }
        let out = output.join(format!("page_{num:03}{TOKENS_SUFFIX}"));
        fs::write(&out, body).with_context(|| format!("writing {}", out.display()))?;
        tracing::debug!(page = name, terms = terms.len(), "tokenized page");
    }

    tracing::info!(pages = pages.len(), total_terms, output = %output.display(), "tokenization complete");
    Ok(())
}

/// Read every token file into `term -> doc ids`.
fn read_token_files(files: &[PathBuf]) -> Result<HashMap<String, Vec<DocId>>> {
    let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
    for file in files {
        let name = file_name(file);
        let doc_id = doc_num_from_name(name)
            .with_context(|| format!("cannot extract a document number from {name}"))?;
        let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        for line in text.lines() {
            let term = line.trim();
            if term.is_empty() { continue; }
            postings.entry(term.to_string()).or_default().push(doc_id);
        }
    }
    Ok(postings)
}

fn build_index(input: &Path, output: &Path) -> Result<()> {
    let files = collect_files(input, |name| name.ends_with(TOKENS_SUFFIX));
    if files.is_empty() {
        bail!("no *{TOKENS_SUFFIX} files in {}", input.display());
    }

    let index = InvertedIndex::from_postings(read_token_files(&files)?);
    let paths = IndexPaths::new(output);
    save_index(paths.index_json(), &index)?;
    save_index_text(paths.index_text(), &index)?;

    tracing::info!(
        num_terms = index.num_terms(),
        num_docs = index.num_docs(),
        output = %paths.root.display(),
        "index build complete"
    );
    Ok(())
}
