pub mod aggregate;
pub mod ai;
pub mod dashboard;
pub mod facts;
pub mod store;
