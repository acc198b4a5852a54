use migstrat::{PluginDescriptor, ResourceName, ResourceSet};
use serde::Serialize;

#[allow(clippy::upper_case_acronyms)]
#[derive(clap::ValueEnum, Clone)]
pub enum Outputs {
    CLI,
    JSON,
    Quiet,
}

/// A plugin descriptor, optionally with the devices it currently advertises.
#[derive(Serialize)]
pub struct PluginInfo {
    #[serde(flatten)]
    pub descriptor: PluginDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct MatchResult {
    pub strategy: String,
    pub device: String,
    pub resource: ResourceName,
    pub matches: bool,
}

pub trait Output {
    fn print_plugins(&self, plugins: &[PluginInfo]);
    fn print_resources(&self, strategy: &str, resources: &ResourceSet);
    fn print_match(&self, result: &MatchResult);

    fn print_error(&self, error: anyhow::Error);
}
