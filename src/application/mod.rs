//! Application services (use cases).
//!
//! These services drive the posting pipeline and coordinate adapters
//! through the ports in [`crate::port`].

pub mod orchestrator;
pub mod render;

pub use orchestrator::{Collaborators, CycleReport, Orchestrator, PostOutcome, RunPhase};
pub use render::MessageRenderer;
