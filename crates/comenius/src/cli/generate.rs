//! Tutorial generation command handler.

use crate::cli::GenerateArgs;
use comenius_core::{Chapter, Section, Tutorial, TutorialEvent};
use comenius_models::{ProviderKind, ProvidersConfig, SourceBackedSearch};
use comenius_pipeline::{GenerateTutorialBuilder, GenerationPipeline, RetryPolicy};
use futures_util::StreamExt;
use std::sync::Arc;

/// Runs a generation request, printing each event as one JSON line on
/// stdout.  Ctrl-C flags the session for cancellation; the run winds
/// down with a `stopped` event at its next unit boundary.
pub async fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProvidersConfig::load()?;
    let source = match args.provider.as_deref() {
        Some(name) => {
            let kind: ProviderKind = name.parse()?;
            config.source_for(kind)?
        }
        None => config.source()?,
    };
    let source: Arc<dyn comenius_interface::TextSource> = Arc::new(source);

    let mut pipeline = GenerationPipeline::new(Arc::clone(&source));
    if args.search {
        pipeline = pipeline.with_search(Arc::new(SourceBackedSearch::new(source)));
    }
    if let Some(max) = args.max_attempts {
        pipeline = pipeline.with_retry(RetryPolicy::limited(max));
    }

    let resumed = match args.resume.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Some(serde_json::from_str::<Tutorial>(&json)?)
        }
        None => None,
    };

    let request = GenerateTutorialBuilder::default()
        .session_id(args.session.clone())
        .topic(args.topic)
        .tutorial(resumed.clone())
        .use_search(args.search)
        .build()?;

    let mut document = resumed.unwrap_or_default();
    let mut failure: Option<String> = None;

    let stream = pipeline.generate(request);
    tokio::pin!(stream);
    let mut interrupted = false;
    loop {
        tokio::select! {
            maybe = stream.next() => {
                let Some(event) = maybe else { break };
                apply(&mut document, &event);
                println!("{}", serde_json::to_string(&event)?);
                if let TutorialEvent::Error { message } = &event {
                    failure = Some(message.clone());
                }
            }
            result = tokio::signal::ctrl_c(), if !interrupted => {
                result?;
                interrupted = true;
                tracing::info!(session = %args.session, "interrupt received, stopping session");
                pipeline.stop(&args.session);
            }
        }
    }

    if let Some(path) = args.output.as_deref() {
        std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
        tracing::info!(path = %path.display(), "tutorial saved");
    }

    match failure {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

/// Folds structured events into the local document copy so `--output`
/// can save what the run produced.
fn apply(document: &mut Tutorial, event: &TutorialEvent) {
    match event {
        TutorialEvent::Chapter { data } => {
            document.chapters.push(Chapter::new(
                data.number,
                data.title.clone(),
                data.description.clone(),
            ));
        }
        TutorialEvent::Section { data } => {
            if let Some(chapter) = document
                .chapters
                .iter_mut()
                .find(|c| c.number == data.chapter)
            {
                chapter.sections.push(Section::new(
                    data.number.clone(),
                    data.title.clone(),
                    data.description.clone(),
                ));
            }
        }
        TutorialEvent::Content { data } => {
            if let Some(section) = document.section_mut(data.chapter, &data.section) {
                section.content = data.content.clone();
            }
        }
        _ => {}
    }
}
