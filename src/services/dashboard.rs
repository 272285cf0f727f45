use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AiFacts, AppointmentField, DashboardSnapshot, DashboardView, DistributionPoint, FactState,
    LoadState,
};
use crate::services::aggregate::aggregate;
use crate::services::ai::facts::FactRequester;
use crate::services::facts::derive_facts;
use crate::services::store::AppointmentStore;

/// At most this many facts are shown.
pub const MAX_FACTS: usize = 5;

/// Owns the current load-cycle result. One cycle runs at a time; triggers that
/// arrive while a cycle is in flight are rejected. A started cycle always
/// completes, even if the caller stops waiting for it.
pub struct Dashboard {
    store: Box<dyn AppointmentStore>,
    facts: FactRequester,
    state: Mutex<LoadState>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Dashboard {
    pub fn new(store: Box<dyn AppointmentStore>, facts: FactRequester) -> Self {
        Self {
            store,
            facts,
            state: Mutex::new(LoadState::Loading),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> LoadState {
        self.lock_state().clone()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from(&*self.lock_state())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one full load cycle on its own task and stores its result.
    pub async fn load(self: &Arc<Self>) -> Result<LoadState, AppError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("ignoring load trigger, a cycle is already in flight");
            return Err(AppError::LoadInProgress);
        }

        let dashboard = Arc::clone(self);
        let cycle = tokio::spawn(async move {
            let _in_flight = InFlight(&dashboard.in_flight);

            *dashboard.lock_state() = LoadState::Loading;
            let state = dashboard.run_cycle().await;
            *dashboard.lock_state() = state.clone();
            state
        });

        cycle.await.map_err(|e| {
            tracing::error!(error = %e, "dashboard load task failed");
            let message = format!("Failed to load data: {e}");
            *self.lock_state() = LoadState::Error {
                message: message.clone(),
            };
            AppError::LoadFailed(message)
        })
    }

    /// Aggregates the loaded records on any field.
    pub fn distribution(&self, field: &AppointmentField) -> Result<Vec<DistributionPoint>, AppError> {
        match &*self.lock_state() {
            LoadState::Ready(snapshot) => Ok(aggregate(&snapshot.records, field)),
            _ => Err(AppError::NotReady),
        }
    }

    async fn run_cycle(&self) -> LoadState {
        let cycle_id = Uuid::new_v4();
        tracing::info!(%cycle_id, "loading dashboard");

        let records = match self.store.fetch_appointments().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(%cycle_id, error = %e, "failed to fetch appointments");
                return LoadState::Error {
                    message: format!("Failed to load data: {e:#}"),
                };
            }
        };

        let status_chart = aggregate(&records, &AppointmentField::Status);
        let type_chart = aggregate(&records, &AppointmentField::ApptType);

        // Empty data never reaches the model.
        let (facts, summary) = if records.is_empty() {
            (FactState::empty_data(), Vec::new())
        } else {
            let facts = match self.facts.request_facts(&records).await {
                AiFacts::Generated(mut facts) | AiFacts::ServiceFailure(mut facts) => {
                    facts.truncate(MAX_FACTS);
                    FactState::NormalFacts { facts }
                }
                AiFacts::MissingCredential(instructions) => {
                    FactState::MissingCredential { instructions }
                }
            };
            (facts, derive_facts(&records))
        };

        tracing::info!(
            %cycle_id,
            records = records.len(),
            facts = facts.as_str(),
            "dashboard loaded"
        );

        LoadState::Ready(Box::new(DashboardSnapshot {
            cycle_id,
            loaded_at: Utc::now(),
            records,
            status_chart,
            type_chart,
            facts,
            summary,
        }))
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::config::CredentialSource;
    use crate::models::Appointment;
    use crate::services::ai::facts::{FALLBACK_FACTS, MISSING_KEY_INSTRUCTIONS};
    use crate::services::ai::{GenerationRequest, LlmProvider};

    struct StaticStore {
        rows: anyhow::Result<Vec<Appointment>>,
        delay: Duration,
    }

    #[async_trait]
    impl AppointmentStore for StaticStore {
        async fn fetch_appointments(&self) -> anyhow::Result<Vec<Appointment>> {
            tokio::time::sleep(self.delay).await;
            match &self.rows {
                Ok(records) => Ok(records.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    struct CountingLlm {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmProvider for CountingLlm {
        async fn generate(&self, _api_key: &str, _request: &GenerationRequest) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn dashboard(
        records: anyhow::Result<Vec<Appointment>>,
        reply: &str,
        key: Option<&str>,
    ) -> (Arc<Dashboard>, Arc<AtomicUsize>) {
        slow_dashboard(records, reply, key, Duration::ZERO)
    }

    fn slow_dashboard(
        records: anyhow::Result<Vec<Appointment>>,
        reply: &str,
        key: Option<&str>,
        delay: Duration,
    ) -> (Arc<Dashboard>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let llm = CountingLlm {
            reply: reply.to_string(),
            calls: Arc::clone(&calls),
        };
        let facts = FactRequester::new(
            Box::new(llm),
            CredentialSource::Fixed(key.map(str::to_string)),
        );
        let store = StaticStore { rows: records, delay };
        (Arc::new(Dashboard::new(Box::new(store), facts)), calls)
    }

    fn sample() -> Vec<Appointment> {
        vec![
            Appointment::new("CONFIRMED", "FOLLOW-UP"),
            Appointment::new("CONFIRMED", "FOLLOW-UP"),
            Appointment::new("PENDING", "NEW"),
        ]
    }

    fn snapshot(state: LoadState) -> DashboardSnapshot {
        match state {
            LoadState::Ready(snapshot) => *snapshot,
            other => panic!("expected ready state, got {}", other.as_str()),
        }
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let (dashboard, _) = dashboard(Ok(vec![]), "", None);
        assert!(matches!(dashboard.current(), LoadState::Loading));
        assert!(dashboard.view().loading);
    }

    #[tokio::test]
    async fn test_normal_facts_are_capped() {
        let reply = r#"{"facts":["1","2","3","4","5","6","7"]}"#;
        let (dashboard, calls) = dashboard(Ok(sample()), reply, Some("key"));

        let snap = snapshot(dashboard.load().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            snap.facts,
            FactState::NormalFacts {
                facts: vec!["1", "2", "3", "4", "5"].into_iter().map(String::from).collect()
            }
        );
        assert_eq!(snap.status_chart.len(), 2);
        assert_eq!(snap.type_chart.len(), 2);
        assert_eq!(snap.summary.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_data_skips_model() {
        let (dashboard, calls) = dashboard(Ok(vec![]), r#"{"facts":["x"]}"#, Some("key"));

        let snap = snapshot(dashboard.load().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(snap.facts, FactState::empty_data());
        assert!(snap.status_chart.is_empty());
        assert!(snap.summary.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_skips_request() {
        let (dashboard, calls) = dashboard(Ok(sample()), r#"{"facts":["x"]}"#, None);

        let snap = snapshot(dashboard.load().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            snap.facts,
            FactState::MissingCredential {
                instructions: MISSING_KEY_INSTRUCTIONS.iter().map(|s| s.to_string()).collect()
            }
        );
        // Charts still render.
        assert_eq!(snap.status_chart.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_reply_degrades_to_fallback() {
        let (dashboard, _) = dashboard(Ok(sample()), r#"{"insights":[]}"#, Some("key"));

        let snap = snapshot(dashboard.load().await.unwrap());
        assert_eq!(
            snap.facts,
            FactState::NormalFacts {
                facts: FALLBACK_FACTS.iter().map(|s| s.to_string()).collect()
            }
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_error_state() {
        let (dashboard, calls) = dashboard(Err(anyhow::anyhow!("relation does not exist")), "", Some("key"));

        let state = dashboard.load().await.unwrap();
        match state {
            LoadState::Error { message } => {
                assert_eq!(message, "Failed to load data: relation does not exist")
            }
            other => panic!("expected error state, got {}", other.as_str()),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let view = dashboard.view();
        assert!(view.error.is_some());
        assert!(view.facts.is_none());
        assert!(view.status_chart.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_overlapping_load() {
        let (dashboard, calls) = slow_dashboard(
            Ok(sample()),
            r#"{"facts":["x"]}"#,
            Some("key"),
            Duration::from_millis(50),
        );

        let (first, second) = tokio::join!(dashboard.load(), dashboard.load());
        assert!(matches!(first, Ok(LoadState::Ready(_))));
        assert!(matches!(second, Err(AppError::LoadInProgress)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!dashboard.is_loading());

        assert!(dashboard.load().await.is_ok());
    }

    #[tokio::test]
    async fn test_abandoned_load_still_completes() {
        let (dashboard, _) = slow_dashboard(
            Ok(sample()),
            r#"{"facts":["x"]}"#,
            Some("key"),
            Duration::from_millis(100),
        );
        dashboard.load().await.unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(10), dashboard.load()).await;
        assert!(abandoned.is_err());
        assert!(matches!(dashboard.current(), LoadState::Loading));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(matches!(dashboard.current(), LoadState::Ready(_)));
        assert!(!dashboard.is_loading());
        assert!(dashboard.distribution(&AppointmentField::Status).is_ok());
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot() {
        let (dashboard, calls) = dashboard(Ok(sample()), r#"{"facts":["x"]}"#, Some("key"));

        let first = snapshot(dashboard.load().await.unwrap());
        let second = snapshot(dashboard.load().await.unwrap());
        assert_ne!(first.cycle_id, second.cycle_id);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distribution_requires_ready_state() {
        let (dashboard, _) = dashboard(Ok(sample()), r#"{"facts":["x"]}"#, Some("key"));
        assert!(matches!(
            dashboard.distribution(&AppointmentField::Status),
            Err(AppError::NotReady)
        ));

        dashboard.load().await.unwrap();
        let points = dashboard.distribution(&AppointmentField::ApptType).unwrap();
        assert_eq!(
            points,
            vec![
                DistributionPoint { name: "FOLLOW-UP".to_string(), value: 2 },
                DistributionPoint { name: "NEW".to_string(), value: 1 },
            ]
        );
    }
}
