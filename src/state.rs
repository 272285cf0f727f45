use std::sync::Arc;

use crate::services::dashboard::Dashboard;

pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}
