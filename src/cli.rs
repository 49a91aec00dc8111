use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use docsift::search::{DEFAULT_RESULT_COUNT, SearchParams};

#[derive(Debug, Parser)]
#[command(
    name = "docsift",
    about = "Boolean search and relevance ranking for folders of text documents"
)]
pub struct Cli {
    /// Directory of documents to search (defaults to $DOCSIFT_CORPUS, then
    /// the XDG data directory)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter documents with a boolean query and rank the matches
    Search(SearchArgs),
    /// Compile a query and print its evaluation order
    Check(CheckArgs),
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Boolean query, e.g. '("spring boot" OR springboot) AND java AND NOT sales'
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_COUNT)]
    pub count: usize,

    /// Return all results above the score threshold
    #[arg(long)]
    pub all: bool,

    /// Minimum relevance score
    #[arg(long, default_value = "0")]
    pub min_score: u64,

    /// Only search documents whose relative path matches this glob
    #[arg(short = 'g', long)]
    pub glob: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,

    /// Show a snippet around the first matching term
    #[arg(short = 's', long)]
    pub snippets: bool,
}

impl SearchArgs {
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            query: self.query.clone(),
            count: self.count,
            all: self.all,
            min_score: self.min_score,
            glob: self.glob.clone(),
            snippets: self.snippets,
        }
    }
}

// -- Check --

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Boolean query to compile
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docsift",
            &mut std::io::stdout(),
        );
    }
}
