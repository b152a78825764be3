//! Prediction flow state machine
//!
//! A [`PredictionFlow`] owns one form, the section cursor, and the submission
//! state. Submission runs the configured [`Predictor`] on a background task;
//! the outcome is delivered once through the [`FlowCompletion`] handed out at
//! construction.
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Complete
//!                             \--err/timeout--> Failed
//! ```
//!
//! Complete and Failed are terminal. Hosts drop the flow and build a new one.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{FieldId, FormState, PredictionResult, Section, StepCursor};
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};

use crate::external::{PredictionError, Predictor};

/// Where the prediction request stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "outcome", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Complete(PredictionResult),
    Failed(String),
}

impl SubmissionState {
    pub fn status(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Complete(_) => "complete",
            SubmissionState::Failed(_) => "failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SubmissionState::Idle)
    }
}

/// Final result of a submission, delivered exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed(PredictionResult),
    Failed(String),
}

impl From<FlowOutcome> for SubmissionState {
    fn from(outcome: FlowOutcome) -> Self {
        match outcome {
            FlowOutcome::Completed(result) => SubmissionState::Complete(result),
            FlowOutcome::Failed(reason) => SubmissionState::Failed(reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Form is not editable while {0}")]
    NotEditable(&'static str),

    #[error("Prediction already {0}")]
    AlreadySubmitted(&'static str),
}

/// Receiving end of a flow's outcome
#[derive(Debug)]
pub struct FlowCompletion(oneshot::Receiver<FlowOutcome>);

impl FlowCompletion {
    /// Wait for the outcome
    ///
    /// Resolves to `None` if the flow was dropped before it finished.
    pub async fn wait(self) -> Option<FlowOutcome> {
        self.0.await.ok()
    }
}

/// Point-in-time copy of a flow
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub step: u8,
    pub section: Section,
    pub form: FormState,
    pub submission: SubmissionState,
}

struct FlowInner {
    form: FormState,
    step: StepCursor,
    submission: SubmissionState,
    completion: Option<oneshot::Sender<FlowOutcome>>,
}

/// Multi-section input form with a single asynchronous submission
pub struct PredictionFlow {
    inner: Arc<Mutex<FlowInner>>,
    predictor: Arc<dyn Predictor>,
    timeout: Duration,
}

impl PredictionFlow {
    /// Fresh flow with the default form on section 1
    pub fn new(predictor: Arc<dyn Predictor>, timeout: Duration) -> (Self, FlowCompletion) {
        let (tx, rx) = oneshot::channel();
        let inner = FlowInner {
            form: FormState::default(),
            step: StepCursor::default(),
            submission: SubmissionState::Idle,
            completion: Some(tx),
        };

        let flow = Self {
            inner: Arc::new(Mutex::new(inner)),
            predictor,
            timeout,
        };
        (flow, FlowCompletion(rx))
    }

    /// Set one field from a raw input value, clamped and step-rounded
    ///
    /// Only allowed while idle. Returns the stored value.
    pub async fn set_field(&self, field: FieldId, raw: f64) -> Result<Decimal, FlowError> {
        let mut inner = self.inner.lock().await;
        if !inner.submission.is_idle() {
            return Err(FlowError::NotEditable(inner.submission.status()));
        }

        let value = inner.form.set(field, raw);
        tracing::debug!(%field, raw, %value, "Field updated");
        Ok(value)
    }

    /// Move to the next section, saturating at the last
    pub async fn advance_step(&self) -> u8 {
        let mut inner = self.inner.lock().await;
        inner.step.advance();
        inner.step.get()
    }

    /// Move to the previous section, saturating at the first
    pub async fn retreat_step(&self) -> u8 {
        let mut inner = self.inner.lock().await;
        inner.step.retreat();
        inner.step.get()
    }

    /// Start the prediction
    ///
    /// The flow is `Submitting` by the time this returns. The predictor runs
    /// on a spawned task holding only a weak reference to the flow, so a flow
    /// dropped mid-submission never receives or reports its result.
    pub async fn submit(&self) -> Result<(), FlowError> {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            if !inner.submission.is_idle() {
                tracing::warn!(status = inner.submission.status(), "Duplicate submit ignored");
                return Err(FlowError::AlreadySubmitted(inner.submission.status()));
            }
            inner.submission = SubmissionState::Submitting;
            inner.form.clone()
        };

        let flow = Arc::downgrade(&self.inner);
        let predictor = Arc::clone(&self.predictor);
        let timeout = self.timeout;

        tracing::info!(predictor = predictor.name(), "Prediction submitted");

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, predictor.predict(&snapshot)).await {
                Ok(Ok(result)) => FlowOutcome::Completed(result),
                Ok(Err(e)) => FlowOutcome::Failed(e.to_string()),
                Err(_) => FlowOutcome::Failed(PredictionError::Timeout(timeout).to_string()),
            };

            let Some(inner) = flow.upgrade() else {
                tracing::debug!("Flow discarded before prediction finished, dropping outcome");
                return;
            };

            let mut inner = inner.lock().await;
            match &outcome {
                FlowOutcome::Completed(result) => {
                    tracing::info!(best_crop = %result.best_crop.crop, "Prediction complete")
                }
                FlowOutcome::Failed(reason) => tracing::warn!(%reason, "Prediction failed"),
            }
            inner.submission = outcome.clone().into();
            if let Some(tx) = inner.completion.take() {
                // The host may have stopped listening; the state still records the outcome
                let _ = tx.send(outcome);
            }
        });

        Ok(())
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.submission.clone()
    }

    pub async fn form(&self) -> FormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn step(&self) -> u8 {
        self.inner.lock().await.step.get()
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        let inner = self.inner.lock().await;
        FlowSnapshot {
            step: inner.step.get(),
            section: inner.step.section(),
            form: inner.form.clone(),
            submission: inner.submission.clone(),
        }
    }
}
