use crate::device::{Accelerator, DeviceAccessor, Partition, collect_mig_devices};
use crate::resources::ResourceName;
use crate::strategy::MigStrategy;
use crate::MigError;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const RESOURCE_NAMESPACE: &str = "nvidia.com";
pub const GPU_RESOURCE_NAME: &str = "gpu";
pub const VISIBLE_DEVICES_ENV: &str = "NVIDIA_VISIBLE_DEVICES";
pub const DEVICE_PLUGIN_PATH: &str = "/var/lib/kubelet/device-plugins/";

/// Which devices a plugin advertises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DeviceScope {
    /// Whole GPUs. MIG-enabled GPUs are left out when `skip_mig_enabled` is set.
    Gpu { skip_mig_enabled: bool },
    /// MIG devices accepted by the strategy's matcher for `resource`.
    Mig { resource: ResourceName },
}

/// Everything the advertisement server needs to run one device plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PluginDescriptor {
    pub resource_name: String,
    pub scope: DeviceScope,
    pub visible_devices_env: String,
    pub socket: PathBuf,
    #[serde(skip)]
    strategy: MigStrategy,
}

impl PluginDescriptor {
    fn new(strategy: &MigStrategy, resource: &str, scope: DeviceScope) -> Self {
        Self {
            resource_name: format!("{RESOURCE_NAMESPACE}/{resource}"),
            scope,
            visible_devices_env: VISIBLE_DEVICES_ENV.to_string(),
            socket: PathBuf::from(format!("{DEVICE_PLUGIN_PATH}nvidia-{resource}.sock")),
            strategy: strategy.clone(),
        }
    }

    fn gpu(strategy: &MigStrategy, skip_mig_enabled: bool) -> Self {
        Self::new(
            strategy,
            GPU_RESOURCE_NAME,
            DeviceScope::Gpu { skip_mig_enabled },
        )
    }

    fn mig(strategy: &MigStrategy, resource: ResourceName) -> Self {
        Self::new(
            strategy,
            resource.as_str(),
            DeviceScope::Mig {
                resource: resource.clone(),
            },
        )
    }

    pub fn strategy(&self) -> &MigStrategy {
        &self.strategy
    }

    /// Re-validates at allocation time that a MIG device still belongs to this plugin.
    ///
    /// Plugins advertising whole GPUs never match a MIG device.
    pub fn matches<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
        mig: Partition,
    ) -> crate::Result<bool> {
        match &self.scope {
            DeviceScope::Gpu { .. } => Ok(false),
            DeviceScope::Mig { resource } => {
                self.strategy.matches_resource(accessor, mig, resource)
            }
        }
    }

    /// Lists the devices currently advertised by this plugin.
    pub fn devices<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
    ) -> crate::Result<Vec<AdvertisedDevice>> {
        let mut devices = Vec::new();
        match &self.scope {
            DeviceScope::Gpu { skip_mig_enabled } => {
                for gpu in accessor.accelerators()? {
                    if *skip_mig_enabled && accessor.is_mig_enabled(gpu)? {
                        continue;
                    }
                    devices.push(AdvertisedDevice::Gpu(gpu));
                }
            }
            DeviceScope::Mig { .. } => {
                for mig in collect_mig_devices(accessor)? {
                    if self.matches(accessor, mig)? {
                        devices.push(AdvertisedDevice::Mig(mig));
                    }
                }
            }
        }
        Ok(devices)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvertisedDevice {
    Gpu(Accelerator),
    Mig(Partition),
}

impl Display for AdvertisedDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvertisedDevice::Gpu(gpu) => gpu.fmt(f),
            AdvertisedDevice::Mig(mig) => mig.fmt(f),
        }
    }
}

impl MigStrategy {
    /// Builds the plugin descriptors for the current state of the node.
    ///
    /// The mixed strategies return the whole-GPU plugin first, followed by one plugin
    /// per MIG resource in sorted order.
    pub fn plugins<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
    ) -> crate::Result<Vec<PluginDescriptor>> {
        log::info!("Building device plugins for MIG strategy '{}'", self.name());
        match self {
            MigStrategy::None => Ok(vec![PluginDescriptor::gpu(self, false)]),
            MigStrategy::Single => {
                let resources = self.resource_set(accessor)?;
                if resources.len() != 1 {
                    return Err(MigError::HeterogeneousMigConfiguration {
                        strategy: self.name().to_string(),
                        resources: resources.iter().map(|r| r.to_string()).collect(),
                    });
                }
                log::info!(
                    "All MIG devices are of type {}",
                    resources.first().map(|r| r.as_str()).unwrap_or_default()
                );
                let resource = ResourceName::new(GPU_RESOURCE_NAME)?;
                Ok(vec![PluginDescriptor::mig(self, resource)])
            }
            MigStrategy::Mixed
            | MigStrategy::MixedMemoryQualified
            | MigStrategy::MixedFractionallyQualified(_) => {
                let resources = self.resource_set(accessor)?;
                log::info!(
                    "Found {} MIG resource(s): [{}]",
                    resources.len(),
                    resources
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                let mut plugins = Vec::with_capacity(resources.len() + 1);
                plugins.push(PluginDescriptor::gpu(self, true));
                plugins.extend(
                    resources
                        .into_iter()
                        .map(|resource| PluginDescriptor::mig(self, resource)),
                );
                Ok(plugins)
            }
        }
    }
}
