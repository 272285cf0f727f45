use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Appointment, DistributionPoint, FactState};

/// Result of one load cycle.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Error { message: String },
    Ready(Box<DashboardSnapshot>),
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Error { .. } => "error",
            LoadState::Ready(_) => "ready",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub cycle_id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub records: Vec<Appointment>,
    pub status_chart: Vec<DistributionPoint>,
    pub type_chart: Vec<DistributionPoint>,
    pub facts: FactState,
    /// Locally derived facts; empty when there is no data.
    pub summary: Vec<String>,
}

/// Render-ready view handed to the page. `error` overrides every other section.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub status_chart: Vec<DistributionPoint>,
    pub type_chart: Vec<DistributionPoint>,
    pub facts: Option<FactState>,
    pub summary: Vec<String>,
    pub record_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub cycle_id: Option<Uuid>,
}

impl From<&LoadState> for DashboardView {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::Loading => DashboardView {
                loading: true,
                ..Default::default()
            },
            LoadState::Error { message } => DashboardView {
                error: Some(message.clone()),
                ..Default::default()
            },
            LoadState::Ready(snapshot) => DashboardView {
                loading: false,
                error: None,
                status_chart: snapshot.status_chart.clone(),
                type_chart: snapshot.type_chart.clone(),
                facts: Some(snapshot.facts.clone()),
                summary: snapshot.summary.clone(),
                record_count: snapshot.records.len(),
                loaded_at: Some(snapshot.loaded_at),
                cycle_id: Some(snapshot.cycle_id),
            },
        }
    }
}
