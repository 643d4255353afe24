//! Three-stage generation orchestrator.
//!
//! [`GenerationPipeline::generate`] turns a topic into a tutorial by
//! driving a [`TextSource`] through three stages: chapter outline,
//! section outline per chapter, prose content per section.  Every
//! emission goes out on one ordered event stream; exactly one terminal
//! event ends each run, always last.

use crate::accumulator::StreamAccumulator;
use crate::outline;
use crate::prompts;
use crate::registry::SessionRegistry;
use crate::retry::RetryPolicy;
use comenius_core::{
    ProgressStatus, SectionContent, SectionOutline, Stage, Tutorial, TutorialEvent,
};
use comenius_error::{PipelineError, PipelineErrorKind};
use comenius_interface::{SearchProvider, TextSource};
use derive_builder::Builder;
use derive_getters::Getters;
use futures_util::{Stream, StreamExt};
use std::sync::Arc;

/// A generation request.
///
/// Supplying a partially populated [`Tutorial`] resumes a previous run:
/// chapters that already have sections and sections that already have
/// content are skipped, everything else is generated in order.
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerateTutorial {
    /// Caller-chosen session identifier, the handle for cancellation.
    session_id: String,
    /// Topic to build the tutorial around.
    topic: String,
    /// Existing document to resume from, if any.
    #[builder(default)]
    tutorial: Option<Tutorial>,
    /// Whether to run a web search before generating.
    #[builder(default)]
    use_search: bool,
}

/// How a run ended, resolved at the single terminal-emission site.
enum RunOutcome {
    Stopped,
    Failed(String),
    Complete,
}

/// The stage orchestrator.
#[derive(Clone)]
pub struct GenerationPipeline {
    source: Arc<dyn TextSource>,
    search: Option<Arc<dyn SearchProvider>>,
    registry: SessionRegistry,
    retry: RetryPolicy,
}

impl GenerationPipeline {
    /// Creates a pipeline over a text source with no search provider,
    /// a fresh registry, and unbounded retries.
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self {
            source,
            search: None,
            registry: SessionRegistry::new(),
            retry: RetryPolicy::unbounded(),
        }
    }

    /// Attaches a search provider for request-time web context.
    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Replaces the session registry, letting callers share one
    /// registry across pipelines.
    pub fn with_registry(mut self, registry: SessionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The shared session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Flags a running session for cancellation.  Returns true when a
    /// live session was found; the run acknowledges with a `stopped`
    /// event at its next unit boundary.
    pub fn stop(&self, session_id: &str) -> bool {
        self.registry.stop(session_id)
    }

    /// Runs a generation request, returning the ordered event stream.
    ///
    /// The stream is lazy: nothing happens until it is polled, and
    /// dropping it abandons the run.  Backpressure is inherent, the
    /// pipeline only advances while the consumer reads.
    pub fn generate(
        &self,
        request: GenerateTutorial,
    ) -> impl Stream<Item = TutorialEvent> + Send + 'static {
        let source = Arc::clone(&self.source);
        let search = self.search.clone();
        let registry = self.registry.clone();
        let retry = self.retry;

        async_stream::stream! {
            let GenerateTutorial { session_id, topic, tutorial, use_search } = request;

            if !registry.start(&session_id) {
                let err = PipelineError::new(PipelineErrorKind::SessionActive(session_id.clone()));
                tracing::warn!(%session_id, "rejecting duplicate session");
                yield TutorialEvent::Error { message: err.to_string() };
                return;
            }
            tracing::info!(%session_id, %topic, "generation run starting");

            let outcome = 'run: {
                // Optional web search, once per run.
                let mut web_context: Option<String> = None;
                if use_search {
                    if let Some(search) = search.as_ref() {
                        yield TutorialEvent::Info {
                            message: "正在联网搜索主题背景资料".into(),
                        };
                        match search.search(&topic).await {
                            Ok(summary) if !summary.trim().is_empty() => {
                                web_context = Some(summary);
                            }
                            Ok(_) => tracing::warn!("web search returned nothing"),
                            Err(error) => tracing::warn!(%error, "web search failed"),
                        }
                    }
                }

                let mut tutorial = tutorial.unwrap_or_default();

                // A document with no remaining work terminates at once,
                // without stage progress chatter.
                if tutorial.is_complete() {
                    break 'run RunOutcome::Complete;
                }

                // Stage A: chapter outline.  Skipped when the request
                // already carries chapters.
                if tutorial.chapters.is_empty() {
                    yield TutorialEvent::Progress {
                        stage: Stage::Chapters,
                        status: ProgressStatus::Start,
                        count: None,
                    };
                    let prompt = prompts::chapter_outline(&topic, web_context.as_deref());
                    let mut attempt = 0u32;
                    let chapters = loop {
                        if !registry.is_live(&session_id) {
                            break 'run RunOutcome::Stopped;
                        }
                        attempt += 1;
                        if !retry.allows(attempt) {
                            let err = PipelineError::new(PipelineErrorKind::RetriesExhausted {
                                stage: Stage::Chapters.to_string(),
                                attempts: attempt - 1,
                            });
                            break 'run RunOutcome::Failed(err.to_string());
                        }
                        let mut acc = StreamAccumulator::new();
                        let mut fragments = match source.stream_text(&prompt).await {
                            Ok(stream) => stream,
                            Err(error) => {
                                tracing::warn!(%error, attempt, "chapter outline call failed");
                                continue;
                            }
                        };
                        let mut broken = false;
                        while let Some(item) = fragments.next().await {
                            match item {
                                Ok(fragment) => {
                                    acc.push(&fragment);
                                    yield TutorialEvent::Chunk { content: fragment };
                                }
                                Err(error) => {
                                    tracing::warn!(%error, attempt, "chapter outline stream broke");
                                    broken = true;
                                    break;
                                }
                            }
                        }
                        if broken {
                            continue;
                        }
                        match outline::parse_chapters(acc.text()) {
                            Ok(chapters) => break chapters,
                            Err(error) => {
                                tracing::warn!(%error, attempt, "chapter outline did not parse");
                            }
                        }
                    };
                    for chapter in &chapters {
                        yield TutorialEvent::Chapter { data: chapter.into() };
                    }
                    let count = chapters.len();
                    tutorial.chapters = chapters;
                    yield TutorialEvent::Progress {
                        stage: Stage::Chapters,
                        status: ProgressStatus::Complete,
                        count: Some(count),
                    };
                }

                if tutorial.chapters.is_empty() {
                    let err = PipelineError::new(PipelineErrorKind::EmptyChapters);
                    break 'run RunOutcome::Failed(err.to_string());
                }

                // Stage B: section outline, one unit per chapter.
                yield TutorialEvent::Progress {
                    stage: Stage::Sections,
                    status: ProgressStatus::Start,
                    count: None,
                };
                let mut new_sections = 0usize;
                for index in 0..tutorial.chapters.len() {
                    if tutorial.chapters[index].is_outlined() {
                        continue;
                    }
                    let mut attempt = 0u32;
                    let sections = loop {
                        if !registry.is_live(&session_id) {
                            break 'run RunOutcome::Stopped;
                        }
                        attempt += 1;
                        if !retry.allows(attempt) {
                            let err = PipelineError::new(PipelineErrorKind::RetriesExhausted {
                                stage: Stage::Sections.to_string(),
                                attempts: attempt - 1,
                            });
                            break 'run RunOutcome::Failed(err.to_string());
                        }
                        let chapter = &tutorial.chapters[index];
                        let prompt = prompts::section_outline(
                            &topic,
                            chapter,
                            &tutorial.outline_snapshot(),
                            web_context.as_deref(),
                        );
                        let chapter_number = chapter.number;
                        let mut acc = StreamAccumulator::new();
                        let mut fragments = match source.stream_text(&prompt).await {
                            Ok(stream) => stream,
                            Err(error) => {
                                tracing::warn!(%error, attempt, chapter = chapter_number, "section outline call failed");
                                continue;
                            }
                        };
                        let mut broken = false;
                        while let Some(item) = fragments.next().await {
                            match item {
                                Ok(fragment) => {
                                    acc.push(&fragment);
                                    yield TutorialEvent::Chunk { content: fragment };
                                }
                                Err(error) => {
                                    tracing::warn!(%error, attempt, chapter = chapter_number, "section outline stream broke");
                                    broken = true;
                                    break;
                                }
                            }
                        }
                        if broken {
                            continue;
                        }
                        match outline::parse_sections(acc.text(), chapter_number) {
                            Ok(sections) => break sections,
                            Err(error) => {
                                tracing::warn!(%error, attempt, chapter = chapter_number, "section outline did not parse");
                            }
                        }
                    };
                    let chapter_number = tutorial.chapters[index].number;
                    for section in &sections {
                        yield TutorialEvent::Section {
                            data: SectionOutline::new(chapter_number, section),
                        };
                    }
                    new_sections += sections.len();
                    tutorial.chapters[index].sections = sections;
                }
                yield TutorialEvent::Progress {
                    stage: Stage::Sections,
                    status: ProgressStatus::Complete,
                    count: Some(new_sections),
                };

                // Stage C: prose content, one unit per section.
                yield TutorialEvent::Progress {
                    stage: Stage::Content,
                    status: ProgressStatus::Start,
                    count: None,
                };
                let mut filled = 0usize;
                for ci in 0..tutorial.chapters.len() {
                    let chapter_number = tutorial.chapters[ci].number;
                    for si in 0..tutorial.chapters[ci].sections.len() {
                        if tutorial.chapters[ci].sections[si].has_content() {
                            continue;
                        }
                        let mut attempt = 0u32;
                        let content = loop {
                            if !registry.is_live(&session_id) {
                                break 'run RunOutcome::Stopped;
                            }
                            attempt += 1;
                            if !retry.allows(attempt) {
                                let err = PipelineError::new(PipelineErrorKind::RetriesExhausted {
                                    stage: Stage::Content.to_string(),
                                    attempts: attempt - 1,
                                });
                                break 'run RunOutcome::Failed(err.to_string());
                            }
                            let prompt = prompts::section_content(
                                &topic,
                                &tutorial.chapters[ci].sections[si],
                                &tutorial.outline_snapshot(),
                                web_context.as_deref(),
                            );
                            let mut acc = StreamAccumulator::new();
                            let mut fragments = match source.stream_text(&prompt).await {
                                Ok(stream) => stream,
                                Err(error) => {
                                    tracing::warn!(%error, attempt, chapter = chapter_number, "content call failed");
                                    continue;
                                }
                            };
                            let mut broken = false;
                            while let Some(item) = fragments.next().await {
                                match item {
                                    Ok(fragment) => {
                                        acc.push(&fragment);
                                        yield TutorialEvent::Chunk { content: fragment };
                                    }
                                    Err(error) => {
                                        tracing::warn!(%error, attempt, chapter = chapter_number, "content stream broke");
                                        broken = true;
                                        break;
                                    }
                                }
                            }
                            if broken {
                                continue;
                            }
                            let text = acc.into_text();
                            if text.trim().is_empty() {
                                tracing::warn!(attempt, chapter = chapter_number, "content came back empty");
                                continue;
                            }
                            break text;
                        };
                        let section_number = tutorial.chapters[ci].sections[si].number.clone();
                        tutorial.chapters[ci].sections[si].content = content.clone();
                        filled += 1;
                        yield TutorialEvent::Content {
                            data: SectionContent {
                                chapter: chapter_number,
                                section: section_number,
                                content,
                            },
                        };
                    }
                }
                yield TutorialEvent::Progress {
                    stage: Stage::Content,
                    status: ProgressStatus::Complete,
                    count: Some(filled),
                };

                RunOutcome::Complete
            };

            match outcome {
                RunOutcome::Stopped => {
                    tracing::info!(%session_id, "generation run stopped by request");
                    yield TutorialEvent::Stopped;
                }
                RunOutcome::Failed(message) => {
                    tracing::error!(%session_id, %message, "generation run failed");
                    yield TutorialEvent::Error { message };
                }
                RunOutcome::Complete => {
                    tracing::info!(%session_id, "generation run complete");
                    yield TutorialEvent::Complete {
                        message: "教程生成完成".into(),
                    };
                }
            }
            registry.remove(&session_id);
        }
    }
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("provider", &self.source.provider_name())
            .field("model", &self.source.model_name())
            .field("search", &self.search.is_some())
            .field("retry", &self.retry)
            .finish()
    }
}
