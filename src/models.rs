pub mod correction;
pub mod types;
pub mod user;
