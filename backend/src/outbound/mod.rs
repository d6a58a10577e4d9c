//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern: adapters are thin
//! translators between domain types and infrastructure-specific
//! representations and contain no business logic.
//!
//! - **memory**: process-local stores standing in for the relational
//!   database a production deployment would provide, plus the demo seed.
//! - **render**: the built-in HTML fragment renderer behind the
//!   `RenderFragment` port.

pub mod memory;
pub mod render;
