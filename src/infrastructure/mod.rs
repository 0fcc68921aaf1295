//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, wiring, the in-process
//! message bus and the control loop lifecycle.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`bus`] - In-process message bus
//! - [`config`] - Configuration loading and validation
//! - [`operator`] - CLI operator interface
//! - [`runtime`] - Control loop startup and shutdown

pub mod bootstrap;
pub mod bus;
pub mod config;
pub mod operator;
pub mod runtime;
