//! End-to-end pipeline runs against a scripted text source.

use async_trait::async_trait;
use comenius_core::{Chapter, Section, Tutorial, TutorialEvent};
use comenius_error::{ComeniusResult, ProviderError, ProviderErrorKind};
use comenius_interface::{TextSource, TextStream};
use comenius_pipeline::{GenerateTutorialBuilder, GenerationPipeline, RetryPolicy};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What one scripted prompt call does.
enum Call {
    /// Stream the text line by line, then end cleanly.
    Text(&'static str),
    /// Fail before any fragment arrives.
    Refuse,
    /// Stream some fragments, then break mid-stream.
    Break(&'static str),
}

/// Pops one scripted behavior per prompt call, in order.
struct ScriptedSource {
    script: Mutex<VecDeque<Call>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(script: Vec<Call>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextSource for ScriptedSource {
    async fn stream_text(&self, _prompt: &str) -> ComeniusResult<TextStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let call = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted source ran out of calls");
        match call {
            Call::Text(text) => {
                let fragments: Vec<ComeniusResult<String>> = text
                    .split_inclusive('\n')
                    .map(|line| Ok(line.to_owned()))
                    .collect();
                Ok(Box::pin(futures_util::stream::iter(fragments)))
            }
            Call::Refuse => Err(ProviderError::new(ProviderErrorKind::ServerUnreachable(
                "scripted refusal".into(),
            ))
            .into()),
            Call::Break(text) => {
                let mut fragments: Vec<ComeniusResult<String>> = text
                    .split_inclusive('\n')
                    .map(|line| Ok(line.to_owned()))
                    .collect();
                fragments.push(Err(ProviderError::new(ProviderErrorKind::StreamError(
                    "scripted break".into(),
                ))
                .into()));
                Ok(Box::pin(futures_util::stream::iter(fragments)))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

const CHAPTERS: &str = "# 第1章 向量\n<introduces vectors>\n# 第2章 矩阵\n<introduces matrices>\n";
const SECTIONS_CH1: &str = "## 1.1 向量的定义\n<defines vectors>\n## 1.2 向量运算\n<adds and scales>\n";
const SECTIONS_CH2: &str = "## 2.1 矩阵的定义\n<defines matrices>\n";

fn happy_script() -> Vec<Call> {
    vec![
        Call::Text(CHAPTERS),
        Call::Text(SECTIONS_CH1),
        Call::Text(SECTIONS_CH2),
        Call::Text("向量的定义，详细讲解。\n"),
        Call::Text("向量运算，详细讲解。\n"),
        Call::Text("矩阵的定义，详细讲解。\n"),
    ]
}

fn terminal_count(events: &[TutorialEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}

#[tokio::test]
async fn full_run_emits_ordered_events_and_completes() {
    let source = ScriptedSource::new(happy_script());
    let pipeline = GenerationPipeline::new(source.clone());
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("给初学者的线性代数")
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    assert_eq!(terminal_count(&events), 1);
    assert!(matches!(events.last(), Some(TutorialEvent::Complete { .. })));
    assert_eq!(source.calls(), 6);

    let chapter_numbers: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Chapter { data } => Some(data.number),
            _ => None,
        })
        .collect();
    assert_eq!(chapter_numbers, [1, 2]);

    let section_numbers: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Section { data } => Some(data.number.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(section_numbers, ["1.1", "1.2", "2.1"]);

    let contents: Vec<(&str, u32)> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Content { data } => Some((data.section.as_str(), data.chapter)),
            _ => None,
        })
        .collect();
    assert_eq!(contents, [("1.1", 1), ("1.2", 1), ("2.1", 2)]);

    // Chunks of the chapter call precede the first chapter event.
    let first_chunk = events
        .iter()
        .position(|e| matches!(e, TutorialEvent::Chunk { .. }))
        .unwrap();
    let first_chapter = events
        .iter()
        .position(|e| matches!(e, TutorialEvent::Chapter { .. }))
        .unwrap();
    assert!(first_chunk < first_chapter);

    // Progress completions carry the unit counts.
    let counts: Vec<Option<usize>> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Progress {
                status: comenius_core::ProgressStatus::Complete,
                count,
                ..
            } => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, [Some(2), Some(3), Some(3)]);

    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn cross_chapter_sections_are_discarded() {
    let source = ScriptedSource::new(vec![
        Call::Text("# 第1章 向量\n<intro>\n"),
        Call::Text("## 1.1 定义\n<good>\n## 2.1 不属于本章\n<bad>\n"),
        Call::Text("正文。\n"),
    ]);
    let pipeline = GenerationPipeline::new(source);
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    let sections: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Section { data } => Some(data.number.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sections, ["1.1"]);
    assert!(matches!(events.last(), Some(TutorialEvent::Complete { .. })));
}

#[tokio::test]
async fn complete_input_makes_no_calls() {
    let mut chapter = Chapter::new(1, "第1章 向量", "intro");
    let mut section = Section::new("1.1", "定义", "d");
    section.content = "已有正文".into();
    chapter.sections.push(section);
    let tutorial = Tutorial::new(vec![chapter]);

    let source = ScriptedSource::new(Vec::new());
    let pipeline = GenerationPipeline::new(source.clone());
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .tutorial(Some(tutorial))
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    assert_eq!(source.calls(), 0);
    // The terminal is the whole stream: no chunks, no structured units,
    // no stage progress.
    assert_eq!(events.len(), 1);
    assert!(matches!(events.first(), Some(TutorialEvent::Complete { .. })));
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn stop_is_acknowledged_at_the_next_unit_boundary() {
    let source = ScriptedSource::new(happy_script());
    let pipeline = GenerationPipeline::new(source);
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .build()
        .unwrap();

    let stream = pipeline.generate(request);
    tokio::pin!(stream);

    let mut events = Vec::new();
    let mut stopped_mid_run = false;
    while let Some(event) = stream.next().await {
        let chapters_done = matches!(
            &event,
            TutorialEvent::Progress {
                stage: comenius_core::Stage::Chapters,
                status: comenius_core::ProgressStatus::Complete,
                ..
            }
        );
        events.push(event);
        if chapters_done {
            assert!(pipeline.stop("s1"));
            stopped_mid_run = true;
        }
    }

    assert!(stopped_mid_run);
    assert_eq!(terminal_count(&events), 1);
    assert!(matches!(events.last(), Some(TutorialEvent::Stopped)));
    // Nothing structural after the chapter stage got through.
    assert!(!events.iter().any(|e| matches!(
        e,
        TutorialEvent::Section { .. } | TutorialEvent::Content { .. }
    )));
    assert!(pipeline.registry().is_empty());
    // A second stop finds nothing to cancel.
    assert!(!pipeline.stop("s1"));
}

#[tokio::test]
async fn failed_attempts_retry_until_the_blob_parses() {
    let mut script = vec![
        Call::Refuse,
        Call::Break("# 第1章 向"),
        Call::Text("自由发挥，没有任何标题。\n"),
    ];
    script.extend(happy_script());
    let source = ScriptedSource::new(script);
    let pipeline = GenerationPipeline::new(source.clone());
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    // Three failed chapter attempts, then the six productive calls.
    assert_eq!(source.calls(), 9);
    assert!(matches!(events.last(), Some(TutorialEvent::Complete { .. })));
    let chapter_numbers: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Chapter { data } => Some(data.number),
            _ => None,
        })
        .collect();
    // Failed attempts contribute no structured events.
    assert_eq!(chapter_numbers, [1, 2]);
}

#[tokio::test]
async fn limited_policy_gives_up_with_an_error() {
    let source = ScriptedSource::new(vec![Call::Refuse, Call::Refuse]);
    let pipeline = GenerationPipeline::new(source.clone()).with_retry(RetryPolicy::limited(2));
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    assert_eq!(source.calls(), 2);
    assert_eq!(terminal_count(&events), 1);
    match events.last() {
        Some(TutorialEvent::Error { message }) => {
            assert!(message.contains("chapters"), "unexpected message: {message}");
        }
        other => panic!("expected error terminal, got {other:?}"),
    }
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn duplicate_session_id_is_rejected_without_touching_the_run() {
    let source = ScriptedSource::new(happy_script());
    let pipeline = GenerationPipeline::new(source.clone());

    let first = pipeline.generate(
        GenerateTutorialBuilder::default()
            .session_id("s1")
            .topic("线性代数")
            .build()
            .unwrap(),
    );
    tokio::pin!(first);
    // Poll one event so the session registers.
    let _ = first.next().await;

    let second: Vec<TutorialEvent> = pipeline
        .generate(
            GenerateTutorialBuilder::default()
                .session_id("s1")
                .topic("线性代数")
                .build()
                .unwrap(),
        )
        .collect()
        .await;
    assert_eq!(second.len(), 1);
    match &second[0] {
        TutorialEvent::Error { message } => assert!(message.contains("already active")),
        other => panic!("expected error, got {other:?}"),
    }

    // The original run is unharmed and finishes.
    let mut rest: Vec<TutorialEvent> = Vec::new();
    while let Some(event) = first.next().await {
        rest.push(event);
    }
    assert!(matches!(rest.last(), Some(TutorialEvent::Complete { .. })));
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn resume_skips_populated_chapters_and_sections() {
    let mut done = Chapter::new(1, "第1章 向量", "intro");
    let mut filled = Section::new("1.1", "定义", "d");
    filled.content = "已有正文".into();
    done.sections.push(filled);
    done.sections.push(Section::new("1.2", "运算", "d"));
    let bare = Chapter::new(2, "第2章 矩阵", "intro");
    let tutorial = Tutorial::new(vec![done, bare]);

    // Chapter 2 needs sections, then 1.2 and 2.1 need content.
    let source = ScriptedSource::new(vec![
        Call::Text(SECTIONS_CH2),
        Call::Text("1.2 的正文。\n"),
        Call::Text("2.1 的正文。\n"),
    ]);
    let pipeline = GenerationPipeline::new(source.clone());
    let request = GenerateTutorialBuilder::default()
        .session_id("s1")
        .topic("线性代数")
        .tutorial(Some(tutorial))
        .build()
        .unwrap();

    let events: Vec<TutorialEvent> = pipeline.generate(request).collect().await;

    assert_eq!(source.calls(), 3);
    assert!(matches!(events.last(), Some(TutorialEvent::Complete { .. })));
    // No chapter events: stage A was skipped.
    assert!(!events.iter().any(|e| matches!(e, TutorialEvent::Chapter { .. })));
    let sections: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Section { data } => Some(data.number.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sections, ["2.1"]);
    let contents: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            TutorialEvent::Content { data } => Some(data.section.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, ["1.2", "2.1"]);
}
