//! AeroCode: aircraft production tracking
//!
//! In-memory stores for aircraft, production stages, parts, quality tests,
//! employees and reports, gated by a three-level role session.

pub mod cli;
pub mod core;
pub mod entities;
