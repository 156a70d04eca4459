//! Research compilation: the join that merges every angle's findings.

use newsroom_types::content::Dossier;
use newsroom_types::event::{PipelineEvent, kind};

use crate::engine::{EngineError, Step, StepContext};

use super::keys;

/// Collects one `angle-researched` event per planned angle, then emits the
/// merged dossier exactly once.
///
/// The expected count comes from the context, where desk research stored
/// it before fanning out. References keep a fixed shape: the desk pass
/// first, then each angle's URLs in the order their findings arrived.
pub struct CompileResearchStep;

impl Step<PipelineEvent> for CompileResearchStep {
    fn name(&self) -> &'static str {
        "compile-research"
    }

    fn accepts(&self) -> &'static [&'static str] {
        &[kind::ANGLE_RESEARCHED]
    }

    fn emits(&self) -> &'static [&'static str] {
        &[kind::RESEARCH_COMPILED]
    }

    async fn handle(
        &self,
        event: PipelineEvent,
        ctx: StepContext<PipelineEvent>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let expected: usize = ctx.get_required(keys::ANGLE_COUNT)?;
        let Some(events) = ctx.collect(event, expected)? else {
            return Ok(vec![]);
        };

        let mut blocks = Vec::with_capacity(events.len());
        let mut references: Vec<String> = ctx.get_required(keys::DESK_REFERENCES)?;
        for event in events {
            if let PipelineEvent::AngleResearched { findings } = event {
                blocks.push(findings.material());
                references.extend(findings.urls());
            }
        }

        ctx.update(format!("compiled research from {expected} angles"));
        tracing::debug!(
            run_id = %ctx.run_id(),
            references = references.len(),
            "research compiled"
        );

        Ok(vec![PipelineEvent::ResearchCompiled {
            dossier: Dossier {
                material: blocks.join("\n"),
                references,
            },
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::step_ctx;
    use newsroom_types::content::{AngleFindings, SourceExcerpt};

    fn researched(angle: &str) -> PipelineEvent {
        PipelineEvent::AngleResearched {
            findings: AngleFindings {
                angle: angle.to_string(),
                excerpts: vec![SourceExcerpt {
                    content: format!("notes on {angle}"),
                    url: format!("https://sources.test/{angle}"),
                }],
            },
        }
    }

    #[tokio::test]
    async fn join_fires_once_with_desk_references_first() {
        let step = CompileResearchStep;
        let (ctx, _rx) = step_ctx("compile-research");
        ctx.set(keys::ANGLE_COUNT, &3usize).unwrap();
        ctx.set(
            keys::DESK_REFERENCES,
            &vec!["https://sources.test/topic".to_string()],
        )
        .unwrap();

        assert!(step.handle(researched("a"), ctx.clone()).await.unwrap().is_empty());
        assert!(step.handle(researched("b"), ctx.clone()).await.unwrap().is_empty());

        let out = step.handle(researched("c"), ctx.clone()).await.unwrap();
        let [PipelineEvent::ResearchCompiled { dossier }] = out.as_slice() else {
            panic!("expected one dossier event, got {out:?}");
        };
        assert_eq!(
            dossier.references,
            vec![
                "https://sources.test/topic",
                "https://sources.test/a",
                "https://sources.test/b",
                "https://sources.test/c",
            ]
        );
        assert_eq!(dossier.material, "notes on a\nnotes on b\nnotes on c");
    }

    #[tokio::test]
    async fn missing_angle_count_is_an_error() {
        let step = CompileResearchStep;
        let (ctx, _rx) = step_ctx("compile-research");

        let err = step.handle(researched("a"), ctx).await.unwrap_err();
        assert!(matches!(err, EngineError::ContextMissing { key } if key == keys::ANGLE_COUNT));
    }

    #[tokio::test]
    async fn straggler_after_firing_is_an_error() {
        let step = CompileResearchStep;
        let (ctx, _rx) = step_ctx("compile-research");
        ctx.set(keys::ANGLE_COUNT, &1usize).unwrap();
        ctx.set(keys::DESK_REFERENCES, &Vec::<String>::new()).unwrap();

        assert!(!step.handle(researched("a"), ctx.clone()).await.unwrap().is_empty());

        let err = step.handle(researched("b"), ctx).await.unwrap_err();
        assert!(matches!(err, EngineError::JoinOverflow { .. }));
    }
}
