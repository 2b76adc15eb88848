use anyhow::Result;
use boolsearch_core::persist::{load_doc_urls, load_index};
use boolsearch_core::query::postfix_to_string;
use boolsearch_core::{DocId, QueryEngine};
use clap::Parser;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "boolsearch")]
#[command(about = "Boolean search over an inverted index", long_about = None)]
struct Cli {
    /// Path to inverted_index.json
    #[arg(long, default_value = "./index/inverted_index.json")]
    index: String,
    /// Crawler listing (`N<TAB>url`) used to print the source of each hit
    #[arg(long)]
    urls: Option<String>,
    /// Run a single query and exit instead of starting the prompt
    #[arg(long)]
    query: Option<String>,
    /// Print the postfix program of each query
    #[arg(long, default_value_t = false)]
    explain: bool,
}

const EXAMPLE_QUERY: &str = "(клеопатра AND цезарь) OR (антоний AND цицерон) OR помпей";

/// Answers queries and renders hits for the terminal.
struct Session {
    engine: QueryEngine,
    urls: HashMap<DocId, String>,
    explain: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let engine = QueryEngine::new(load_index(&cli.index)?);
    let urls = match &cli.urls {
        Some(path) => load_doc_urls(path)?,
        None => HashMap::new(),
    };
    tracing::debug!(index = %cli.index, explain = cli.explain, "index ready");
    let session = Session { engine, urls, explain: cli.explain };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // a failed one-shot query is reported once, by main's error return
    if let Some(query) = cli.query {
        return session.run_query(&query, &mut out);
    }
    session.repl(io::stdin().lock(), &mut out)
}

impl Session {
    fn repl<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Boolean search. Operators: AND OR NOT, parentheses ().")?;
        writeln!(out, "Example: {EXAMPLE_QUERY}")?;
        writeln!(out, "Empty line exits.\n")?;
        let mut lines = input.lines();
        loop {
            write!(out, "query> ")?;
            out.flush()?;
            let Some(line) = lines.next() else { break };
            let query = line?;
            let query = query.trim();
            if query.is_empty() {
                break;
            }
            if let Err(err) = self.run_query(query, out) {
                writeln!(out, "Error: {err}")?;
            }
        }
        Ok(())
    }

    /// Print one query's hits. Query errors come back as `Err` for the caller to report.
    fn run_query<W: Write>(&self, query: &str, out: &mut W) -> Result<()> {
        if self.explain {
            writeln!(out, "Postfix: {}", postfix_to_string(&self.engine.explain(query)?))?;
        }
        let docs = self.engine.search_sorted(query)?;
        writeln!(out, "Documents: {}", docs.len())?;
        for doc in docs {
            match self.urls.get(&doc) {
                Some(url) => writeln!(out, "{doc}\t{url}")?,
                None => writeln!(out, "{doc}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolsearch_core::InvertedIndex;

    fn session(urls: HashMap<DocId, String>, explain: bool) -> Session {
        let engine = QueryEngine::new(InvertedIndex::from_postings(vec![
            ("cat", vec![1, 2, 3]),
            ("dog", vec![2, 3, 4]),
            ("bird", vec![5]),
        ]));
        Session { engine, urls, explain }
    }

    fn transcript(s: &Session, input: &str) -> String {
        let mut out = Vec::new();
        s.repl(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_sorted_hits() {
        let out = transcript(&session(HashMap::new(), false), "cat AND dog\n");
        assert!(out.contains("Documents: 2\n2\n3\n"));
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let out = transcript(&session(HashMap::new(), false), "(cat\ncat dog\nbird\n\nNOT cat\n");
        assert!(out.contains("Error: unbalanced parentheses"));
        assert!(out.contains("Error: malformed query"));
        assert!(out.contains("Documents: 1\n5\n"));
        // the empty line stops the loop before NOT cat
        assert!(!out.contains("Documents: 2\n4\n5\n"));
    }

    #[test]
    fn explain_shows_postfix() {
        let out = transcript(&session(HashMap::new(), true), "cat OR dog AND bird\n");
        assert!(out.contains("Postfix: cat dog bird AND OR"));
    }

    #[test]
    fn hits_show_source_urls() {
        let urls = HashMap::from([(5, "https://example.org/bird".to_string())]);
        let out = transcript(&session(urls, false), "bird OR cat\n");
        assert!(out.contains("1\n2\n3\n5\thttps://example.org/bird\n"));
    }

    #[test]
    fn one_shot_error_is_returned_without_printing() {
        let mut out = Vec::new();
        let err = session(HashMap::new(), false).run_query("(cat", &mut out).unwrap_err();
        assert_eq!(err.to_string(), "unbalanced parentheses");
        assert!(out.is_empty());
    }

    #[test]
    fn banner_example_matches_a_lemmatized_index() {
        let engine = QueryEngine::new(InvertedIndex::from_postings(vec![
            ("клеопатра", vec![1u32]),
            ("цезарь", vec![1, 2]),
            ("помпей", vec![3]),
        ]));
        assert_eq!(engine.search_sorted(EXAMPLE_QUERY).unwrap(), vec![1, 3]);
        let out = transcript(&session(HashMap::new(), false), "");
        assert!(out.contains(EXAMPLE_QUERY));
    }
}
