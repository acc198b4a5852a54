use crate::output::outputs::{MatchResult, Output, PluginInfo};
use migstrat::ResourceSet;

#[derive(Default)]
pub struct Quiet;

impl Output for Quiet {
    fn print_plugins(&self, plugins: &[PluginInfo]) {
        for plugin in plugins {
            println!("{}", plugin.descriptor.resource_name);
        }
    }

    fn print_resources(&self, _strategy: &str, resources: &ResourceSet) {
        for resource in resources {
            println!("{resource}");
        }
    }

    fn print_match(&self, result: &MatchResult) {
        println!("{}", result.matches);
    }

    fn print_error(&self, error: anyhow::Error) {
        eprintln!("{error:?}");
    }
}
