//! Progress events for the Newsroom run bus.
//!
//! `ProgressEvent` is broadcast while a run executes so that subscribers
//! (the CLI status display, logging) can follow along. The bus is lossy and
//! observational only; nothing in the engine depends on delivery.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted during workflow execution and publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A run has been seeded and dispatch has begun.
    RunStarted { run_id: Uuid },

    /// A step invocation has started executing.
    StepStarted { run_id: Uuid, step: String },

    /// A step invocation finished successfully.
    StepCompleted {
        run_id: Uuid,
        step: String,
        duration_ms: u64,
    },

    /// A step invocation failed; the run will end as failed.
    StepFailed {
        run_id: Uuid,
        step: String,
        error: String,
    },

    /// Free-form stage text for the status display.
    StageUpdate { run_id: Uuid, message: String },

    /// The run reached its terminal event.
    RunCompleted { run_id: Uuid, duration_ms: u64 },

    /// The run ended with a failure.
    RunFailed { run_id: Uuid, error: String },

    /// The run hit its deadline before producing a terminal event.
    RunTimedOut { run_id: Uuid },
}

impl ProgressEvent {
    /// The run this event belongs to.
    pub fn run_id(&self) -> Uuid {
        match self {
            ProgressEvent::RunStarted { run_id }
            | ProgressEvent::StepStarted { run_id, .. }
            | ProgressEvent::StepCompleted { run_id, .. }
            | ProgressEvent::StepFailed { run_id, .. }
            | ProgressEvent::StageUpdate { run_id, .. }
            | ProgressEvent::RunCompleted { run_id, .. }
            | ProgressEvent::RunFailed { run_id, .. }
            | ProgressEvent::RunTimedOut { run_id } => *run_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_uuid() -> Uuid {
        Uuid::now_v7()
    }

    #[test]
    fn test_run_started_serde_roundtrip() {
        let event = ProgressEvent::RunStarted {
            run_id: sample_uuid(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"run_started\""));
        let parsed: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, ProgressEvent::RunStarted { .. }));
    }

    #[test]
    fn test_step_completed_serde_roundtrip() {
        let event = ProgressEvent::StepCompleted {
            run_id: sample_uuid(),
            step: "angle-research".to_string(),
            duration_ms: 420,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"step_completed\""));
        let parsed: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            parsed,
            ProgressEvent::StepCompleted { duration_ms: 420, .. }
        ));
    }

    #[test]
    fn test_stage_update_serde_roundtrip() {
        let event = ProgressEvent::StageUpdate {
            run_id: sample_uuid(),
            message: "writing story".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"stage_update\""));
        let parsed: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, ProgressEvent::StageUpdate { .. }));
    }

    #[test]
    fn test_run_id_accessor_covers_all_variants() {
        let id = sample_uuid();
        let events = vec![
            ProgressEvent::RunStarted { run_id: id },
            ProgressEvent::StepStarted {
                run_id: id,
                step: "s".to_string(),
            },
            ProgressEvent::StepCompleted {
                run_id: id,
                step: "s".to_string(),
                duration_ms: 1,
            },
            ProgressEvent::StepFailed {
                run_id: id,
                step: "s".to_string(),
                error: "e".to_string(),
            },
            ProgressEvent::StageUpdate {
                run_id: id,
                message: "m".to_string(),
            },
            ProgressEvent::RunCompleted {
                run_id: id,
                duration_ms: 1,
            },
            ProgressEvent::RunFailed {
                run_id: id,
                error: "e".to_string(),
            },
            ProgressEvent::RunTimedOut { run_id: id },
        ];
        for event in events {
            assert_eq!(event.run_id(), id, "expected id for {event:?}");
        }
    }
}
