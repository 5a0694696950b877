//! Core module - stores, session, configuration and the workspace tying them together

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod logging;
pub mod session;
pub mod store;
pub mod timer;
pub mod workspace;

pub use config::Config;
pub use entity::{Entity, Labeled, Tone};
pub use error::{AeroError, AeroResult};
pub use session::{AccessLevel, Module, Permission, Session, User};
pub use store::Store;
pub use workspace::Workspace;
