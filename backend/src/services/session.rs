//! Session service hosting prediction flows
//!
//! Each session wraps one [`PredictionFlow`]. The service owns the user stats
//! and applies the stats reducer when a session's prediction completes.
//! Sessions past their TTL are swept on create, and the oldest session is
//! evicted once the registry is full.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{FieldId, FormState, Section, UserStats};
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::{Config, PredictorKind};
use crate::error::{AppError, AppResult};
use crate::external::{InferenceClient, MockPredictor, Predictor};
use crate::flow::{FlowCompletion, FlowOutcome, PredictionFlow, SubmissionState};

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Session service for managing hosted flows
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    stats: Arc<RwLock<UserStats>>,
    predictor: Arc<dyn Predictor>,
    timeout: Duration,
    max_sessions: usize,
    session_ttl: Duration,
}

struct Session {
    flow: Arc<PredictionFlow>,
    created_at: DateTime<Utc>,
    started: Instant,
}

/// Session as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: u8,
    pub section: Section,
    pub section_title: String,
    pub fields: Vec<FieldId>,
    pub form: FormState,
    pub submission: SubmissionState,
}

impl SessionService {
    /// Create a new SessionService around an existing predictor
    pub fn new(predictor: Arc<dyn Predictor>, timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(UserStats::default())),
            predictor,
            timeout,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Bound the registry by size and age
    pub fn with_limits(mut self, max_sessions: usize, session_ttl: Duration) -> Self {
        self.max_sessions = max_sessions.max(1);
        self.session_ttl = session_ttl;
        self
    }

    /// Create a SessionService with the predictor selected by configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let prediction = &config.prediction;
        let predictor: Arc<dyn Predictor> = match prediction.backend {
            PredictorKind::Mock => Arc::new(MockPredictor::new(prediction.delay())),
            PredictorKind::Remote => {
                let endpoint = config.inference.api_endpoint.clone().ok_or_else(|| {
                    AppError::Configuration("inference.api_endpoint is not set".to_string())
                })?;
                Arc::new(InferenceClient::new(
                    endpoint,
                    config.inference.api_key.clone(),
                    prediction.timeout(),
                )?)
            }
        };

        tracing::info!(predictor = predictor.name(), "Prediction backend ready");
        Ok(Self::new(predictor, prediction.timeout())
            .with_limits(prediction.max_sessions, prediction.session_ttl()))
    }

    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }

    /// Start a new session with a fresh form
    pub async fn create(&self) -> SessionView {
        let (flow, completion) = PredictionFlow::new(Arc::clone(&self.predictor), self.timeout);
        let id = Uuid::new_v4();
        let session = Session {
            flow: Arc::new(flow),
            created_at: Utc::now(),
            started: Instant::now(),
        };

        self.watch_completion(id, completion);
        let view = Self::view(id, &session.flow, session.created_at).await;

        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions);
        sessions.insert(id, session);
        drop(sessions);

        tracing::info!(session_id = %id, "Session created");
        view
    }

    /// Drop expired sessions, then the oldest ones until a new one fits
    ///
    /// Dropping a session drops its flow, so a pending prediction is
    /// discarded and its completion watcher ends.
    fn evict(&self, sessions: &mut HashMap<Uuid, Session>) {
        let before = sessions.len();
        sessions.retain(|_, session| session.started.elapsed() < self.session_ttl);

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, session)| session.started)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Sessions evicted");
        }
    }

    /// Apply the stats reducer once the session's prediction completes
    fn watch_completion(&self, id: Uuid, completion: FlowCompletion) {
        let stats = Arc::clone(&self.stats);
        tokio::spawn(async move {
            match completion.wait().await {
                Some(FlowOutcome::Completed(_)) => {
                    let mut stats = stats.write().await;
                    stats.on_prediction_complete();
                    tracing::info!(
                        session_id = %id,
                        predictions = stats.predictions_count,
                        level = stats.level,
                        "Stats updated"
                    );
                }
                Some(FlowOutcome::Failed(reason)) => {
                    tracing::warn!(session_id = %id, %reason, "Prediction failed, stats unchanged");
                }
                None => tracing::debug!(session_id = %id, "Session discarded before completion"),
            }
        });
    }

    async fn flow(&self, id: Uuid) -> AppResult<(Arc<PredictionFlow>, DateTime<Utc>)> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))?;
        Ok((Arc::clone(&session.flow), session.created_at))
    }

    async fn view(id: Uuid, flow: &PredictionFlow, created_at: DateTime<Utc>) -> SessionView {
        let snapshot = flow.snapshot().await;
        SessionView {
            id,
            created_at,
            step: snapshot.step,
            section: snapshot.section,
            section_title: snapshot.section.title().to_string(),
            fields: snapshot.section.fields(),
            form: snapshot.form,
            submission: snapshot.submission,
        }
    }

    /// Get a session by ID
    pub async fn get(&self, id: Uuid) -> AppResult<SessionView> {
        let (flow, created_at) = self.flow(id).await?;
        Ok(Self::view(id, &flow, created_at).await)
    }

    /// Discard a session; a pending prediction is dropped with it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))?;

        tracing::info!(session_id = %id, "Session discarded");
        Ok(())
    }

    /// Set a field by name
    pub async fn set_field(&self, id: Uuid, field: &str, value: f64) -> AppResult<SessionView> {
        let field: FieldId = field.parse()?;
        let (flow, _) = self.flow(id).await?;
        let stored: Decimal = flow.set_field(field, value).await?;

        tracing::debug!(session_id = %id, %field, %stored, "Field set");
        self.get(id).await
    }

    pub async fn next_step(&self, id: Uuid) -> AppResult<SessionView> {
        let (flow, _) = self.flow(id).await?;
        flow.advance_step().await;
        self.get(id).await
    }

    pub async fn previous_step(&self, id: Uuid) -> AppResult<SessionView> {
        let (flow, _) = self.flow(id).await?;
        flow.retreat_step().await;
        self.get(id).await
    }

    /// Submit the session's form for prediction
    pub async fn submit(&self, id: Uuid) -> AppResult<SessionView> {
        let (flow, _) = self.flow(id).await?;
        flow.submit().await?;
        self.get(id).await
    }

    /// Current user stats
    pub async fn stats(&self) -> UserStats {
        self.stats.read().await.clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
