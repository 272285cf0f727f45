pub mod supabase;

use async_trait::async_trait;

use crate::models::Appointment;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All appointment rows, projected to the charted fields. Empty table yields an empty list.
    async fn fetch_appointments(&self) -> anyhow::Result<Vec<Appointment>>;
}
