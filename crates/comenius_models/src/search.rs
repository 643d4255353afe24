//! Model-backed external context provider.

use async_trait::async_trait;
use comenius_error::ComeniusResult;
use comenius_interface::{SearchProvider, TextSource};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Produces background context for a topic by asking a text source for a
/// compact research summary.
///
/// This stands in for a live web search: the summary is injected verbatim
/// into later prompts, so it only needs to be plausible supporting text,
/// not authoritative. Callers treat failures as "no external context".
pub struct SourceBackedSearch {
    source: Arc<dyn TextSource>,
}

impl SourceBackedSearch {
    /// Create a search provider over a text source.
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl SearchProvider for SourceBackedSearch {
    #[instrument(skip(self), fields(query_len = query.len()))]
    async fn search(&self, query: &str) -> ComeniusResult<String> {
        let prompt = format!(
            "请为主题【{query}】整理一份简明的背景资料摘要，\
             涵盖核心概念、常见学习路径和权威参考资源。\
             直接输出摘要正文，不要添加任何说明。"
        );

        let mut stream = self.source.stream_text(&prompt).await?;
        let mut summary = String::new();
        while let Some(fragment) = stream.next().await {
            summary.push_str(&fragment?);
        }

        debug!(summary_len = summary.len(), "Collected search summary");
        Ok(summary)
    }
}
