//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams of the control loop. Outbound ports are
//! implemented by adapters that reach the outside world (market data
//! endpoints, strategies, storage, the message bus). Inbound ports are the
//! use-cases operator-facing adapters such as the CLI drive.
//!
//! ```text
//!              ┌──────────────────────────────┐
//!   CLI ──────▶│ inbound::operator            │
//!              │                              │
//!              │  Application (engine, book,  │
//!              │  sweep, orchestrator)        │
//!              │                              │
//!              │ outbound::{bus, provider,    │──────▶ SQLite, Yahoo,
//!              │   scorer, store}             │        strategies
//!              └──────────────────────────────┘
//! ```

pub mod inbound;
pub mod outbound;
