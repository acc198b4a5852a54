pub mod device;
pub mod error;
pub mod fraction;
pub mod plugin;
pub mod resources;
pub mod strategy;

#[cfg(test)]
pub(crate) mod tests;

pub type Error = crate::error::MigError;
pub type Result<T> = std::result::Result<T, Error>;

pub use crate::device::{
    Accelerator, DeviceAccessor, GpuIndex, MigIndex, Partition, PartitionAttributes,
    collect_mig_devices,
};
pub use crate::error::MigError;
pub use crate::fraction::{Fraction, FractionRow, FractionTable};
pub use crate::plugin::{AdvertisedDevice, DeviceScope, PluginDescriptor};
pub use crate::resources::{ResourceName, ResourceSet};
pub use crate::strategy::MigStrategy;
