pub mod cli;
pub mod config;
pub mod error;
pub mod globalsettings;
pub mod setup;
