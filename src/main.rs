use std::io::IsTerminal;

use clap::Parser;
use docsift::{
    CorpusDir,
    error,
    mcp,
    query,
    relevance::QueryTerms,
    search,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{CheckArgs, Cli, Command};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSIFT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Search(args) => {
            let corpus = CorpusDir::resolve(cli.corpus.as_deref())?;
            let params = args.to_params();
            let results = search::execute_search(&params, &corpus)?;

            if args.json {
                search::format_json(&results, &params.query)?;
            } else if args.files {
                search::format_files(&results);
            } else {
                let color = std::io::stdout().is_terminal();
                search::format_human(&results, &params.query, color);
            }
        }
        Command::Check(args) => {
            cmd_check(&args)?;
        }
        Command::Mcp => {
            let corpus = CorpusDir::resolve(cli.corpus.as_deref())?;
            mcp::run_mcp(corpus)?;
        }
        Command::Completions(args) => {
            args.generate();
        }
    }

    Ok(())
}

/// Print how a query compiles, or fail with the compile error.
///
/// This is the only command that surfaces query errors; searches treat a
/// malformed query as matching nothing.
fn cmd_check(args: &CheckArgs) -> error::Result<()> {
    let normalized = query::normalize(&args.query);
    let compiled = query::compile(&args.query)?;
    let terms = QueryTerms::extract(&args.query);

    if args.json {
        let postfix: Vec<String> =
            compiled.postfix.iter().map(ToString::to_string).collect();
        let output = json!({
            "query": args.query,
            "normalized": normalized,
            "postfix": postfix,
            "phrases": compiled.phrases.iter().collect::<Vec<_>>(),
            "scoring": {
                "phrases": terms.phrases,
                "words": terms.words,
            },
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("normalized: {normalized}");
    println!("postfix:    {compiled}");
    for (id, phrase) in compiled.phrases.iter().enumerate() {
        println!("  PHRASE_{id} = \"{phrase}\"");
    }
    if terms.is_empty() {
        println!("scoring:    (no terms)");
    } else {
        let ranked: Vec<String> = terms
            .iter()
            .zip((1..=terms.len()).rev())
            .map(|(term, weight)| format!("{term}(w{weight})"))
            .collect();
        println!("scoring:    {}", ranked.join(" "));
    }
    Ok(())
}
