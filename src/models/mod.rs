pub mod appointment;
pub mod dashboard;
pub mod distribution;
pub mod facts;

pub use appointment::{Appointment, AppointmentField};
pub use dashboard::{DashboardSnapshot, DashboardView, LoadState};
pub use distribution::DistributionPoint;
pub use facts::{AiFacts, FactState, EMPTY_DATA_FACT};
