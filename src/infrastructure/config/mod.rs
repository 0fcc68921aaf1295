//! Infrastructure configuration modules.

pub mod decision;
pub mod feedback;
pub mod logging;
pub mod orchestrator;
pub mod settings;
pub mod strategy;
