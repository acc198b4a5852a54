pub mod commands;
pub mod common;
pub mod output;
pub mod topology;

pub type Error = crate::common::error::AgentError;
pub type Result<T> = std::result::Result<T, Error>;

pub const MIG_AGENT_VERSION: &str = {
    match option_env!("MIG_AGENT_BUILD_VERSION") {
        Some(version) => version,
        None => const_format::concatcp!(env!("CARGO_PKG_VERSION"), "-dev"),
    }
};
