//! Prediction flow integration tests
//!
//! Tests for the form state machine including:
//! - Field clamping and quantization through the flow
//! - Section cursor bounds
//! - Single submission, delayed completion, and failure outcomes
//! - Discarding a flow while a prediction is pending

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crop_prediction_backend::external::{MockPredictor, PredictionError, Predictor};
use crop_prediction_backend::flow::FlowError;
use crop_prediction_backend::{FlowOutcome, PredictionFlow, SubmissionState};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{FieldId, FormState, PredictionResult, StepCursor, YieldCategory};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const TIMEOUT: Duration = Duration::from_secs(30);

fn mock_flow() -> (PredictionFlow, crop_prediction_backend::FlowCompletion) {
    PredictionFlow::new(Arc::new(MockPredictor::default()), TIMEOUT)
}

/// Mock predictor that counts how often it was asked
struct CountingPredictor {
    calls: Arc<AtomicUsize>,
    inner: MockPredictor,
}

#[async_trait]
impl Predictor for CountingPredictor {
    async fn predict(&self, form: &FormState) -> Result<PredictionResult, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(form).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Predictor whose backend is always down
struct FailingPredictor;

#[async_trait]
impl Predictor for FailingPredictor {
    async fn predict(&self, _form: &FormState) -> Result<PredictionResult, PredictionError> {
        Err(PredictionError::Backend("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn counting_flow() -> (
    PredictionFlow,
    crop_prediction_backend::FlowCompletion,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let predictor = CountingPredictor {
        calls: Arc::clone(&calls),
        inner: MockPredictor::default(),
    };
    let (flow, completion) = PredictionFlow::new(Arc::new(predictor), TIMEOUT);
    (flow, completion, calls)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Out-of-range values are clamped, never rejected
    #[tokio::test]
    async fn test_set_field_clamps() {
        let (flow, _completion) = mock_flow();

        assert_eq!(flow.set_field(FieldId::Nitrogen, -5.0).await.unwrap(), dec("0"));
        assert_eq!(flow.set_field(FieldId::Nitrogen, 500.0).await.unwrap(), dec("200"));
        assert_eq!(flow.set_field(FieldId::Temperature, 75.0).await.unwrap(), dec("50"));
    }

    /// pH moves in tenths, everything else in whole units
    #[tokio::test]
    async fn test_set_field_quantizes() {
        let (flow, _completion) = mock_flow();

        assert_eq!(flow.set_field(FieldId::Ph, 6.73).await.unwrap(), dec("6.7"));
        assert_eq!(flow.set_field(FieldId::Humidity, 61.6).await.unwrap(), dec("62"));

        let form = flow.form().await;
        assert_eq!(form.ph, dec("6.7"));
        assert_eq!(form.humidity, dec("62"));
        assert_eq!(form.nitrogen, dec("50"));
    }

    /// Cursor saturates at both ends
    #[tokio::test]
    async fn test_step_cursor_bounds() {
        let (flow, _completion) = mock_flow();

        for _ in 0..10 {
            flow.advance_step().await;
        }
        assert_eq!(flow.step().await, 3);

        assert_eq!(flow.retreat_step().await, 2);
        assert_eq!(flow.retreat_step().await, 1);
        assert_eq!(flow.retreat_step().await, 1);
    }

    /// Submission does not depend on the section being shown
    #[tokio::test(start_paused = true)]
    async fn test_submit_from_first_section() {
        let (flow, completion) = mock_flow();
        assert_eq!(flow.step().await, 1);

        flow.submit().await.unwrap();
        assert!(matches!(
            completion.wait().await,
            Some(FlowOutcome::Completed(_))
        ));
    }

    /// Cursor moves stay available while submitting
    #[tokio::test(start_paused = true)]
    async fn test_step_moves_while_submitting() {
        let (flow, _completion) = mock_flow();
        flow.submit().await.unwrap();

        assert_eq!(flow.advance_step().await, 2);
        assert_eq!(flow.state().await, SubmissionState::Submitting);
    }
}

// ============================================================================
// Submission Scenarios
// ============================================================================

#[cfg(test)]
mod submission_tests {
    use super::*;

    /// Default form submitted, full mock payload after the delay
    #[tokio::test(start_paused = true)]
    async fn test_default_form_end_to_end() {
        let (flow, completion) = mock_flow();
        let started = tokio::time::Instant::now();

        flow.submit().await.unwrap();
        assert_eq!(flow.state().await, SubmissionState::Submitting);

        let outcome = completion.wait().await.expect("flow still alive");
        assert!(started.elapsed() >= Duration::from_millis(3000));

        let FlowOutcome::Completed(result) = outcome else {
            panic!("expected a completed prediction");
        };

        let expected = [
            ("Rice", 92, true, YieldCategory::High),
            ("Wheat", 88, true, YieldCategory::Medium),
            ("Corn", 75, true, YieldCategory::Medium),
            ("Cotton", 45, false, YieldCategory::Low),
        ];
        assert_eq!(result.predictions.len(), 4);
        for (candidate, (crop, confidence, suitable, yield_category)) in
            result.predictions.iter().zip(expected)
        {
            assert_eq!(candidate.crop, crop);
            assert_eq!(candidate.confidence, confidence);
            assert_eq!(candidate.suitable, suitable);
            assert_eq!(candidate.yield_category, yield_category);
        }
        assert_eq!(result.best_crop.crop, "Rice");
        assert_eq!(result.soil_health, 85);
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(result.input_data, FormState::default());

        assert_eq!(flow.state().await, SubmissionState::Complete(result));
    }

    /// Clamped pH is carried into the result; candidates stay fixed
    #[tokio::test(start_paused = true)]
    async fn test_clamped_ph_in_result() {
        let (flow, completion) = mock_flow();
        flow.set_field(FieldId::Ph, 99.0).await.unwrap();
        flow.submit().await.unwrap();

        let Some(FlowOutcome::Completed(result)) = completion.wait().await else {
            panic!("expected a completed prediction");
        };

        assert_eq!(result.input_data.ph, dec("14"));
        assert_eq!(
            result.input_data,
            FormState {
                ph: dec("14"),
                ..FormState::default()
            }
        );
        assert_eq!(
            result.predictions,
            MockPredictor::payload(&FormState::default()).predictions
        );
    }

    /// A second submit while pending is rejected and runs nothing
    #[tokio::test(start_paused = true)]
    async fn test_second_submit_rejected() {
        let (flow, completion, calls) = counting_flow();

        flow.submit().await.unwrap();
        let err = flow.submit().await.unwrap_err();
        assert_eq!(err, FlowError::AlreadySubmitted("submitting"));

        assert!(matches!(
            completion.wait().await,
            Some(FlowOutcome::Completed(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = flow.submit().await.unwrap_err();
        assert_eq!(err, FlowError::AlreadySubmitted("complete"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Dropping the flow mid-submission silently drops the outcome
    #[tokio::test(start_paused = true)]
    async fn test_discard_while_submitting() {
        let (flow, completion, calls) = counting_flow();
        flow.submit().await.unwrap();
        drop(flow);

        assert!(completion.wait().await.is_none());

        // Let the pending prediction run out
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Backend errors become a Failed state and a Failed outcome
    #[tokio::test]
    async fn test_backend_failure() {
        let (flow, completion) = PredictionFlow::new(Arc::new(FailingPredictor), TIMEOUT);
        flow.submit().await.unwrap();

        let Some(FlowOutcome::Failed(reason)) = completion.wait().await else {
            panic!("expected a failed prediction");
        };
        assert!(reason.contains("connection refused"));
        assert_eq!(flow.state().await, SubmissionState::Failed(reason));
    }

    /// Predictions slower than the timeout fail
    #[tokio::test(start_paused = true)]
    async fn test_prediction_timeout() {
        let slow = MockPredictor::new(Duration::from_secs(60));
        let (flow, completion) = PredictionFlow::new(Arc::new(slow), Duration::from_secs(5));
        flow.submit().await.unwrap();

        let Some(FlowOutcome::Failed(reason)) = completion.wait().await else {
            panic!("expected a timed out prediction");
        };
        assert!(reason.contains("timed out"));

        let err = flow.set_field(FieldId::Ph, 7.0).await.unwrap_err();
        assert_eq!(err, FlowError::NotEditable("failed"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Move {
    Advance,
    Retreat,
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Advance), Just(Move::Retreat)]
}

proptest! {
    /// Any sequence of cursor moves stays within sections 1-3
    #[test]
    fn prop_cursor_stays_in_range(moves in prop::collection::vec(move_strategy(), 0..50)) {
        let mut cursor = StepCursor::default();
        let mut model: i32 = 1;

        for m in moves {
            match m {
                Move::Advance => {
                    cursor.advance();
                    model = (model + 1).min(3);
                }
                Move::Retreat => {
                    cursor.retreat();
                    model = (model - 1).max(1);
                }
            }
            prop_assert!((1..=3).contains(&cursor.get()));
            prop_assert_eq!(cursor.get() as i32, model);
        }
    }

    /// Setting a field never disturbs the other six
    #[test]
    fn prop_set_touches_one_field(index in 0usize..7, raw in -1000.0f64..1000.0) {
        let field = FieldId::ALL[index];
        let mut form = FormState::default();
        form.set(field, raw);

        let defaults = FormState::default();
        for other in FieldId::ALL.into_iter().filter(|f| *f != field) {
            prop_assert_eq!(form.get(other), defaults.get(other));
        }
        prop_assert!(field.spec().contains(form.get(field)));
    }
}
