use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    corpus_dir::CorpusDir,
    error,
    search::{self, DEFAULT_RESULT_COUNT, SearchHit, SearchParams},
};

struct DocsiftState {
    corpus: CorpusDir,
}

#[derive(Clone)]
pub struct DocsiftMcpServer {
    state: Arc<DocsiftState>,
    tool_router: ToolRouter<Self>,
}

impl DocsiftMcpServer {
    fn new(state: DocsiftState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl DocsiftMcpServer {
    /// Boolean search over the corpus, ranked by relevance.
    #[tool(
        name = "docsift_search",
        description = "Search documents with a boolean query: words, \"quoted phrases\", AND/OR/NOT and parentheses. Results are ranked by relevance, earlier terms weighing more."
    )]
    pub async fn docsift_search(
        &self,
        params: Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let query = params.query.clone();

        let search_params = SearchParams {
            query: params.query,
            count: params.limit.unwrap_or(DEFAULT_RESULT_COUNT),
            all: params.all.unwrap_or(false),
            min_score: params.min_score.unwrap_or(0),
            glob: params.glob,
            snippets: params.include_snippet.unwrap_or(true),
        };

        let results = search::execute_search(&search_params, &self.state.corpus)
            .map_err(|e| mcp_error("search failed", e))?;

        let summary = format_search_summary(&results, &query);
        let structured = serde_json::to_value(SearchResponse {
            query,
            result_count: results.len(),
            results,
        })
        .map_err(|e| mcp_error("failed to serialize search results", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocsiftMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("docsift", env!("CARGO_PKG_VERSION"))
                    .with_title("docsift MCP"),
            )
            .with_instructions(
                "Use docsift_search with boolean queries such as (python OR golang) AND \"distributed systems\" AND NOT intern. Malformed queries return no results.",
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchToolParams {
    /// Boolean query string.
    pub query: String,
    /// Maximum number of results (default: 10).
    pub limit: Option<usize>,
    /// Minimum relevance score.
    pub min_score: Option<u64>,
    /// Return every match above the score threshold.
    pub all: Option<bool>,
    /// Glob restricting documents by relative path.
    pub glob: Option<String>,
    /// Include a snippet preview (default: true).
    pub include_snippet: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    query: String,
    result_count: usize,
    results: Vec<SearchHit>,
}

fn format_search_summary(results: &[SearchHit], query: &str) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\"");
    }

    let mut lines = Vec::with_capacity(results.len() + 1);
    let suffix = if results.len() == 1 { "" } else { "s" };
    lines.push(format!(
        "Found {} result{} for \"{query}\":",
        results.len(),
        suffix
    ));

    for hit in results {
        lines.push(format!("{:>3}. [{}] {}", hit.rank, hit.score, hit.id));
    }

    lines.join("\n")
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(corpus: CorpusDir) -> error::Result<()> {
    tracing::info!(root = %corpus.root().display(), "starting MCP server");
    let server = DocsiftMcpServer::new(DocsiftState { corpus });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}
