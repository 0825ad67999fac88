//! arXiv paper search tool.
//!
//! Queries the public Atom API and renders titles, the first few authors
//! and a truncated abstract for each entry.

use async_trait::async_trait;
use rustedreact_core::error::ToolError;
use rustedreact_core::tool::{Tool, ToolParams, check_params};
use tracing::debug;

use crate::number_param;

const DEFAULT_MAX_RESULTS: u32 = 3;
const MAX_RESULTS_CAP: u32 = 50;
const AUTHORS_SHOWN: usize = 3;
const SUMMARY_CHARS: usize = 200;

pub struct ArxivTool {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivTool {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<String, reqwest::Error> {
        debug!(query, max_results, "Searching arXiv");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", format!("all:{query}")),
                ("start", "0".to_string()),
                ("max_results", max_results.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(format!("arXiv API error: Status {}", response.status().as_u16()));
        }

        let feed = response.text().await?;
        let papers = parse_feed(&feed);
        if papers.is_empty() {
            return Ok(format!("No papers found for query: {query}"));
        }
        Ok(format_papers(query, &papers, max_results as usize))
    }
}

#[async_trait]
impl Tool for ArxivTool {
    fn name(&self) -> &str {
        "search_arxiv"
    }

    fn description(&self) -> &str {
        "Searches for research papers on arXiv. Input: query (string), max_results (optional, default 3). Example: search_arxiv(query='machine learning', max_results=3)"
    }

    async fn call(&self, params: ToolParams) -> Result<String, ToolError> {
        check_params(&params, &["query", "max_results"])?;
        let query = params
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'query' (string)".into()))?;

        let max_results = match number_param(&params, "max_results")? {
            None => DEFAULT_MAX_RESULTS,
            Some(n) if n.fract() == 0.0 && n >= 1.0 => (n as u32).min(MAX_RESULTS_CAP),
            Some(n) => {
                return Err(ToolError::InvalidArguments(format!(
                    "'max_results' must be a positive integer, got {n}"
                )));
            }
        };

        match self.search(query, max_results).await {
            Ok(out) => Ok(out),
            Err(e) => Ok(format!("Error searching arXiv: {e}")),
        }
    }
}

/// A paper extracted from one Atom `<entry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
}

/// Extract every `<entry>` of an arXiv Atom feed.
///
/// Tolerant by construction: missing elements come back empty rather than
/// failing the whole feed.
pub fn parse_feed(feed: &str) -> Vec<Paper> {
    feed.split("<entry>")
        .skip(1)
        .map(|entry| Paper {
            title: element_text(entry, "title").unwrap_or_default(),
            authors: entry
                .split("<name>")
                .skip(1)
                .filter_map(|chunk| chunk.find("</name>").map(|end| clean_text(&chunk[..end])))
                .collect(),
            summary: element_text(entry, "summary").unwrap_or_default(),
        })
        .collect()
}

/// Render the result listing; `limit` bounds how many entries are shown.
pub fn format_papers(query: &str, papers: &[Paper], limit: usize) -> String {
    let mut out = format!("Found {} papers for '{query}':\n\n", papers.len());
    for (i, paper) in papers.iter().take(limit).enumerate() {
        let authors: Vec<&str> = paper
            .authors
            .iter()
            .take(AUTHORS_SHOWN)
            .map(String::as_str)
            .collect();
        let summary: String = paper.summary.chars().take(SUMMARY_CHARS).collect();

        out.push_str(&format!("{}. {}\n", i + 1, paper.title));
        out.push_str(&format!("   Authors: {}\n", authors.join(", ")));
        out.push_str(&format!("   Summary: {summary}...\n\n"));
    }
    out
}

fn element_text(fragment: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = fragment.find(&open)? + open.len();
    let len = fragment[start..].find(&close)?;
    Some(clean_text(&fragment[start..start + len]))
}

// Decode the XML entities arXiv emits and fold line-wrapped text.
fn clean_text(raw: &str) -> String {
    let decoded = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustedreact_testkit::{FakeServer, closed_port_url};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: search_query=all:transformers</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models are based on complex recurrent or convolutional neural networks that include an encoder and a decoder. The best performing models also connect the encoder and decoder through an attention mechanism.  </summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <author><name>Niki Parmar</name></author>
    <author><name>Jakob Uszkoreit</name></author>
  </entry>
  <entry>
    <title>Q&amp;A with &lt;Transformers&gt;</title>
    <summary>Short.</summary>
    <author><name>Jane Doe</name></author>
  </entry>
</feed>"#;

    const EMPTY_FEED: &str = r#"<?xml version="1.0"?><feed><title>ArXiv Query</title></feed>"#;

    fn params(value: serde_json::Value) -> ToolParams {
        value.as_object().cloned().unwrap()
    }

    async fn serve(status: u16, body: &str) -> (ArxivTool, FakeServer) {
        let server = FakeServer::canned(status, body).await;
        let base = format!("{}/api/query", server.url());
        (ArxivTool::new(reqwest::Client::new(), base), server)
    }

    #[test]
    fn parses_entries_but_not_feed_title() {
        let papers = parse_feed(FEED);
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "Attention Is All You Need");
        assert_eq!(papers[0].authors.len(), 4);
        assert!(papers[0].summary.starts_with("The dominant sequence"));
        assert_eq!(papers[1].title, "Q&A with <Transformers>");
    }

    #[test]
    fn empty_feed_has_no_papers() {
        assert!(parse_feed(EMPTY_FEED).is_empty());
    }

    #[test]
    fn listing_truncates_authors_and_summary() {
        let papers = parse_feed(FEED);
        let out = format_papers("transformers", &papers, 3);

        assert!(out.starts_with("Found 2 papers for 'transformers':\n\n1. Attention Is All You Need\n"));
        assert!(out.contains("   Authors: Ashish Vaswani, Noam Shazeer, Niki Parmar\n"));
        assert!(!out.contains("Uszkoreit"));
        let summary_line = out.lines().find(|l| l.starts_with("   Summary: The dominant")).unwrap();
        assert_eq!(summary_line.len(), "   Summary: ".len() + 200 + 3);
        assert!(out.contains("2. Q&A with <Transformers>\n   Authors: Jane Doe\n   Summary: Short....\n\n"));
    }

    #[test]
    fn listing_respects_limit() {
        let papers = parse_feed(FEED);
        let out = format_papers("t", &papers, 1);
        assert!(out.contains("1. Attention"));
        assert!(!out.contains("2. "));
    }

    #[tokio::test]
    async fn search_sends_query_parameters() {
        let (tool, server) = serve(200, FEED).await;
        let out = tool
            .call(params(serde_json::json!({"query": "machine learning", "max_results": 2})))
            .await
            .unwrap();

        assert!(out.starts_with("Found 2 papers for 'machine learning':"));
        assert_eq!(
            server.requests()[0].target,
            "/api/query?search_query=all%3Amachine+learning&start=0&max_results=2"
        );
    }

    #[tokio::test]
    async fn default_max_results_is_three() {
        let (tool, server) = serve(200, FEED).await;
        tool.call(params(serde_json::json!({"query": "x"}))).await.unwrap();
        assert!(server.requests()[0].target.ends_with("max_results=3"));
    }

    #[tokio::test]
    async fn no_entries() {
        let (tool, _server) = serve(200, EMPTY_FEED).await;
        let out = tool.call(params(serde_json::json!({"query": "zzzz"}))).await.unwrap();
        assert_eq!(out, "No papers found for query: zzzz");
    }

    #[tokio::test]
    async fn upstream_error_status() {
        let (tool, _server) = serve(500, "oops").await;
        let out = tool.call(params(serde_json::json!({"query": "x"}))).await.unwrap();
        assert_eq!(out, "arXiv API error: Status 500");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let tool = ArxivTool::new(reqwest::Client::new(), closed_port_url().await);
        let out = tool.call(params(serde_json::json!({"query": "x"}))).await.unwrap();
        assert!(out.starts_with("Error searching arXiv: "), "{out}");
    }

    #[tokio::test]
    async fn invalid_max_results() {
        let tool = ArxivTool::new(reqwest::Client::new(), "http://unused");
        for bad in [serde_json::json!(0), serde_json::json!(2.5), serde_json::json!("many")] {
            let err = tool
                .call(params(serde_json::json!({"query": "x", "max_results": bad})))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
    }
}
