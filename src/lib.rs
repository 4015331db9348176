pub mod actions;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod username;

// Convenient re-exports (so call sites can do `clubhouse::repair_username`, etc.)
pub use actions::{Action, ActionResponse, dispatch, dispatch_json};
pub use services::{Caller, ServiceError, UserService};
pub use username::{Correction, RepairRule, UsernameProfile, analyze_username, repair_username};
