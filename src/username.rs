//! Username diagnostics.
//!
//! Two concerns live here: [`repair`] guesses the intended username behind a
//! known corruption signature, and [`profile`] summarises the characters a
//! username is made of. Neither performs I/O, so both are safe to call
//! speculatively from anywhere.

mod profile;
mod repair;

pub use profile::UsernameProfile;
pub use repair::{
    Correction, JOAO_PREFIX, JOTA_PREFIX, JOTA_PREFIX_LENGTH, LITERAL_OVERRIDES, MB_TOKEN, MB_TOKEN_LENGTH,
    RepairRule, analyze_username, repair_username,
};

/// Key of the username inside a user's metadata bag.
pub const USERNAME_KEY: &str = "username";
