use migstrat::{DeviceAccessor, MigStrategy, Partition, ResourceName};

use crate::common::cli::{MatchOpts, PluginsOpts};
use crate::common::globalsettings::GlobalSettings;
use crate::output::outputs::{MatchResult, PluginInfo};

pub fn command_plugins(gsettings: &GlobalSettings, opts: PluginsOpts) -> anyhow::Result<()> {
    let strategy = gsettings.mig_strategy()?;
    let node = gsettings.node_topology()?;

    let plugins = strategy
        .plugins(&node)?
        .into_iter()
        .map(|descriptor| -> migstrat::Result<PluginInfo> {
            let devices = if opts.devices {
                Some(
                    descriptor
                        .devices(&node)?
                        .into_iter()
                        .map(|device| device.to_string())
                        .collect::<Vec<_>>(),
                )
            } else {
                None
            };
            Ok(PluginInfo {
                descriptor,
                devices,
            })
        })
        .collect::<migstrat::Result<Vec<_>>>()?;

    gsettings.printer().print_plugins(&plugins);
    Ok(())
}

pub fn command_resources(gsettings: &GlobalSettings) -> anyhow::Result<()> {
    let strategy = gsettings.mig_strategy()?;
    let node = gsettings.node_topology()?;

    if matches!(strategy, MigStrategy::None) {
        log::warn!("MIG strategy '{strategy}' does not expose MIG devices as resources");
    }
    let resources = strategy.resource_set(&node)?;
    gsettings
        .printer()
        .print_resources(strategy.name(), &resources);
    Ok(())
}

pub fn command_match(gsettings: &GlobalSettings, opts: MatchOpts) -> anyhow::Result<()> {
    let strategy = gsettings.mig_strategy()?;
    if matches!(strategy, MigStrategy::None) {
        anyhow::bail!("MIG strategy '{strategy}' does not match MIG devices to resources");
    }
    let node = gsettings.node_topology()?;
    let resource = ResourceName::new(opts.resource)?;
    let mig = Partition::new(opts.gpu, opts.mig);

    // Fails for devices that do not exist, even if the matcher would not look at them
    node.attributes(mig)?;
    if !node.is_mig_enabled(node.parent(mig)?)? {
        anyhow::bail!("GPU {} does not have MIG mode enabled", opts.gpu);
    }

    let matches = strategy.matches_resource(&node, mig, &resource)?;
    gsettings.printer().print_match(&MatchResult {
        strategy: strategy.name().to_string(),
        device: mig.to_string(),
        resource,
        matches,
    });
    Ok(())
}
