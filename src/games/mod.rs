//! Game hub modes.

pub mod vault;
