use cli_table::format::{Justify, Separator};
use cli_table::{Cell, CellStruct, ColorChoice, Style, Table, TableStruct, print_stdout};
use colored::Colorize;
use itertools::Itertools;

use crate::output::outputs::{MatchResult, Output, PluginInfo};
use migstrat::{DeviceScope, ResourceSet};

pub struct CliOutput {
    color_policy: ColorChoice,
}

impl CliOutput {
    pub fn new(color_policy: ColorChoice) -> CliOutput {
        CliOutput { color_policy }
    }

    fn print_horizontal_table(&self, rows: Vec<Vec<CellStruct>>, header: Vec<CellStruct>) {
        let table = rows
            .table()
            .separator(
                Separator::builder()
                    .title(Some(Default::default()))
                    .column(Some(Default::default()))
                    .build(),
            )
            .title(header);
        self.print_table(table);
    }

    fn print_table(&self, table: TableStruct) {
        let table = table.color_choice(self.color_policy);
        if let Err(e) = print_stdout(table) {
            log::error!("Cannot print table to stdout: {e:?}");
        }
    }
}

fn format_scope(scope: &DeviceScope) -> String {
    match scope {
        DeviceScope::Gpu {
            skip_mig_enabled: false,
        } => "all GPUs".to_string(),
        DeviceScope::Gpu {
            skip_mig_enabled: true,
        } => "GPUs without MIG".to_string(),
        DeviceScope::Mig { resource } => format!("MIG ({resource})"),
    }
}

impl Output for CliOutput {
    fn print_plugins(&self, plugins: &[PluginInfo]) {
        let with_devices = plugins.iter().any(|p| p.devices.is_some());
        let rows: Vec<_> = plugins
            .iter()
            .map(|info| {
                let mut row = vec![
                    info.descriptor.resource_name.as_str().cell().bold(true),
                    format_scope(&info.descriptor.scope).cell(),
                    info.descriptor.socket.display().to_string().cell(),
                ];
                if with_devices {
                    let devices = info.devices.as_deref().unwrap_or_default();
                    row.push(devices.len().cell().justify(Justify::Right));
                    row.push(devices.iter().join(",").cell());
                }
                row
            })
            .collect();

        let mut header = vec![
            "Resource".cell().bold(true),
            "Devices from".cell().bold(true),
            "Socket".cell().bold(true),
        ];
        if with_devices {
            header.push("Count".cell().bold(true));
            header.push("Device IDs".cell().bold(true));
        }
        self.print_horizontal_table(rows, header);
    }

    fn print_resources(&self, strategy: &str, resources: &ResourceSet) {
        if resources.is_empty() {
            println!("No MIG resources found (strategy {strategy})");
            return;
        }
        for resource in resources {
            println!("{resource}");
        }
    }

    fn print_match(&self, result: &MatchResult) {
        let verdict = if result.matches {
            "matches".green()
        } else {
            "does not match".red()
        };
        println!(
            "MIG device {} {verdict} resource {} (strategy {})",
            result.device, result.resource, result.strategy
        );
    }

    fn print_error(&self, error: anyhow::Error) {
        eprintln!("{error:?}");
    }
}
