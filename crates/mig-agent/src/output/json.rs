use serde::Serialize;
use serde_json::json;

use crate::output::outputs::{MatchResult, Output, PluginInfo};
use migstrat::ResourceSet;

#[derive(Default)]
pub struct JsonOutput;

impl JsonOutput {
    fn print<T: Serialize + ?Sized>(&self, data: &T) {
        match format_json(data) {
            Ok(output) => println!("{output}"),
            Err(error) => log::error!("Cannot serialize output: {error:?}"),
        }
    }
}

pub fn format_json<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

impl Output for JsonOutput {
    fn print_plugins(&self, plugins: &[PluginInfo]) {
        self.print(plugins);
    }

    fn print_resources(&self, strategy: &str, resources: &ResourceSet) {
        self.print(&json!({
            "strategy": strategy,
            "resources": resources,
        }));
    }

    fn print_match(&self, result: &MatchResult) {
        self.print(result);
    }

    fn print_error(&self, error: anyhow::Error) {
        self.print(&json!({
            "error": format!("{error:?}")
        }));
    }
}
