//! Command handler modules for the `torc` CLI.

pub mod menu;
pub mod status;
