//! Core data models for the presence agent.

mod branch;
mod ids;
mod period;
mod record;
mod user;
mod vacation;

pub use branch::*;
pub use ids::*;
pub use period::*;
pub use record::*;
pub use user::*;
pub use vacation::*;
