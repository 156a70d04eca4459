//! Desk research: initial sweep of the topic and angle planning.

use std::sync::Arc;

use newsroom_types::error::CollaboratorError;
use newsroom_types::event::{PipelineEvent, kind};
use serde::Deserialize;

use crate::collab::{SearchProvider, TextProvider};
use crate::engine::{EngineError, Step, StepContext};

use super::keys;

/// The planner's required response shape.
#[derive(Debug, Deserialize)]
struct PlannedAngles {
    angle_one: String,
    angle_two: String,
    angle_three: String,
}

impl PlannedAngles {
    fn into_list(self) -> Vec<String> {
        vec![self.angle_one, self.angle_two, self.angle_three]
    }
}

/// First step of every run: search the topic itself, then ask the planner
/// for three research angles and fan them out.
///
/// Writes the topic, the desk-pass reference URLs, and the angle count
/// into the context before any angle event is emitted; the compile step
/// depends on the count being there first.
pub struct DeskResearchStep<S, P> {
    search: Arc<S>,
    planner: Arc<P>,
}

impl<S, P> DeskResearchStep<S, P> {
    pub fn new(search: Arc<S>, planner: Arc<P>) -> Self {
        Self { search, planner }
    }
}

impl<S, P> Step<PipelineEvent> for DeskResearchStep<S, P>
where
    S: SearchProvider + 'static,
    P: TextProvider + 'static,
{
    fn name(&self) -> &'static str {
        "desk-research"
    }

    fn accepts(&self) -> &'static [&'static str] {
        &[kind::COMMISSION]
    }

    fn emits(&self) -> &'static [&'static str] {
        &[kind::ANGLE_ASSIGNED]
    }

    async fn handle(
        &self,
        event: PipelineEvent,
        ctx: StepContext<PipelineEvent>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let PipelineEvent::Commission { topic } = event else {
            return Ok(vec![]);
        };

        ctx.update(format!("researching topic: {topic}"));
        let excerpts = self.search.search(&topic).await?;
        let material = excerpts
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let desk_references: Vec<String> = excerpts.iter().map(|e| e.url.clone()).collect();

        ctx.set(keys::TOPIC, &topic)?;
        ctx.set(keys::DESK_REFERENCES, &desk_references)?;

        let prompt = format!(
            "Generate a list of 3 searchable research angles to be passed into a \
             search engine for deeper research, based on this material about the \
             topic '{topic}':\n{material}\n\
             The angles should be closely related to the topic but not overlap, \
             and together they should cover the topic comprehensively.\n\
             No angle may be longer than 10 words.\n\
             Return ONLY a JSON object with the keys \"angle_one\", \
             \"angle_two\", and \"angle_three\"."
        );
        let plan = self.planner.complete_structured(None, &prompt).await?;
        let angles = serde_json::from_value::<PlannedAngles>(plan)
            .map_err(|err| {
                EngineError::Collaborator(CollaboratorError::UnexpectedShape(format!(
                    "angle plan: {err}"
                )))
            })?
            .into_list();

        // The compile step reads this count to size its join, so it must
        // land before the first angle event does.
        ctx.set(keys::ANGLE_COUNT, &angles.len())?;
        tracing::debug!(run_id = %ctx.run_id(), ?angles, "planned research angles");
        ctx.update(format!("pursuing {} research angles", angles.len()));

        Ok(angles
            .into_iter()
            .map(|angle| PipelineEvent::AngleAssigned { angle })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{CannedSearch, ScriptedWriter, step_ctx};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn commission_fans_out_three_angles() {
        let step = DeskResearchStep::new(Arc::new(CannedSearch), Arc::new(ScriptedWriter::default()));
        let (ctx, _rx) = step_ctx("desk-research");

        let out = step
            .handle(
                PipelineEvent::Commission {
                    topic: "Tidal Power".to_string(),
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], PipelineEvent::AngleAssigned { angle } if angle == "alpha angle"));

        let topic: String = ctx.get_required(keys::TOPIC).unwrap();
        assert_eq!(topic, "Tidal Power");
        let count: usize = ctx.get_required(keys::ANGLE_COUNT).unwrap();
        assert_eq!(count, 3);
        let refs: Vec<String> = ctx.get_required(keys::DESK_REFERENCES).unwrap();
        assert_eq!(refs, vec!["https://sources.test/tidal-power".to_string()]);
    }

    struct BrokenPlanner;

    impl TextProvider for BrokenPlanner {
        async fn complete(&self, _prompt: &str) -> Result<String, CollaboratorError> {
            Ok(String::new())
        }

        async fn complete_structured(
            &self,
            _system: Option<&str>,
            _prompt: &str,
        ) -> Result<Value, CollaboratorError> {
            Ok(json!({ "angles": ["only", "a", "list"] }))
        }
    }

    #[tokio::test]
    async fn malformed_angle_plan_is_an_error() {
        let step = DeskResearchStep::new(Arc::new(CannedSearch), Arc::new(BrokenPlanner));
        let (ctx, _rx) = step_ctx("desk-research");

        let err = step
            .handle(
                PipelineEvent::Commission {
                    topic: "tidal power".to_string(),
                },
                ctx,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Collaborator(CollaboratorError::UnexpectedShape(_))
        ));
    }
}
