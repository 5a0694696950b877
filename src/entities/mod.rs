//! Entity type definitions
//!
//! - [`Aircraft`] - aircraft under production, owning their [`Stage`]s
//! - [`Part`] - inventory, optionally fitted to an aircraft
//! - [`Test`] - quality tests scheduled against an aircraft
//! - [`Employee`] - staff records
//! - [`Report`] - generated document records

pub mod aircraft;
pub mod employee;
pub mod part;
pub mod report;
pub mod stage;

pub use aircraft::Aircraft;
pub use employee::Employee;
pub use part::Part;
pub use report::Report;
pub use stage::Stage;
pub use test::Test;
