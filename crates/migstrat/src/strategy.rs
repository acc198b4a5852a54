use crate::device::{DeviceAccessor, Partition, PartitionAttributes, collect_mig_devices};
use crate::fraction::FractionTable;
use crate::resources::{ResourceName, ResourceSet};
use crate::MigError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const MIG_STRATEGY_NONE: &str = "none";
pub const MIG_STRATEGY_SINGLE: &str = "single";
pub const MIG_STRATEGY_MIXED: &str = "mixed";
pub const MIG_STRATEGY_MIXED_MEMORY_QUALIFIED: &str = "mixed-memory-qualified";
pub const MIG_STRATEGY_MIXED_FRACTIONALLY_QUALIFIED: &str = "mixed-fractionally-qualified";

pub const MIG_STRATEGY_NAMES: [&str; 5] = [
    MIG_STRATEGY_NONE,
    MIG_STRATEGY_SINGLE,
    MIG_STRATEGY_MIXED,
    MIG_STRATEGY_MIXED_MEMORY_QUALIFIED,
    MIG_STRATEGY_MIXED_FRACTIONALLY_QUALIFIED,
];

/// Policy that decides how MIG devices are exposed as extended resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigStrategy {
    /// MIG devices are not exposed, whole GPUs are advertised even if MIG is enabled.
    None,
    /// All MIG devices on the node are of one type and advertised as `gpu`.
    Single,
    /// `mig-<G>g.<M>gb`
    Mixed,
    /// `mig-<M>gb`
    MixedMemoryQualified,
    /// `mig-half`, `mig-quarter` or `mig-eighth`
    MixedFractionallyQualified(FractionTable),
}

impl MigStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            MigStrategy::None => MIG_STRATEGY_NONE,
            MigStrategy::Single => MIG_STRATEGY_SINGLE,
            MigStrategy::Mixed => MIG_STRATEGY_MIXED,
            MigStrategy::MixedMemoryQualified => MIG_STRATEGY_MIXED_MEMORY_QUALIFIED,
            MigStrategy::MixedFractionallyQualified(_) => MIG_STRATEGY_MIXED_FRACTIONALLY_QUALIFIED,
        }
    }

    /// Replaces the fraction table of the fractional strategy, other strategies are returned as is.
    pub fn with_fraction_table(self, table: FractionTable) -> Self {
        match self {
            MigStrategy::MixedFractionallyQualified(_) => {
                MigStrategy::MixedFractionallyQualified(table)
            }
            strategy => strategy,
        }
    }

    /// Computes the resource name of a MIG device.
    ///
    /// # Panics
    /// Panics for [`MigStrategy::None`], which does not expose MIG devices.
    pub fn resource_name<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
        mig: Partition,
    ) -> crate::Result<ResourceName> {
        let name = match self {
            MigStrategy::None => {
                panic!("MIG strategy '{MIG_STRATEGY_NONE}' does not name MIG devices")
            }
            MigStrategy::Single => single_resource_name(&accessor.attributes(mig)?),
            MigStrategy::Mixed => mixed_resource_name(&accessor.attributes(mig)?),
            MigStrategy::MixedMemoryQualified => memory_resource_name(&accessor.attributes(mig)?),
            MigStrategy::MixedFractionallyQualified(table) => {
                let parent = accessor.parent(mig)?;
                let max_partitions = accessor.max_partitions(parent)?;
                let attributes = accessor.attributes(mig)?;
                table
                    .classify(attributes.instance_slices, max_partitions)
                    .ok_or_else(|| MigError::UnsupportedPartitionSize {
                        strategy: self.name().to_string(),
                        instance_slices: attributes.instance_slices,
                        max_partitions,
                    })?
                    .resource_name()
                    .to_string()
            }
        };
        log::debug!("MIG device {mig} has resource name {name} ({})", self.name());
        ResourceName::new(name)
    }

    /// Checks whether a MIG device satisfies the given resource.
    ///
    /// # Panics
    /// Panics for [`MigStrategy::None`]; no resource under that strategy is backed by MIG devices.
    pub fn matches_resource<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
        mig: Partition,
        resource: &ResourceName,
    ) -> crate::Result<bool> {
        match self {
            MigStrategy::None => {
                panic!("Resource matching must not be used with MIG strategy '{MIG_STRATEGY_NONE}'")
            }
            MigStrategy::Single => Ok(true),
            MigStrategy::Mixed
            | MigStrategy::MixedMemoryQualified
            | MigStrategy::MixedFractionallyQualified(_) => {
                Ok(self.resource_name(accessor, mig)? == *resource)
            }
        }
    }

    /// Collects the distinct resource names of all MIG devices on the node.
    ///
    /// The set is computed from scratch on every call. It is empty for [`MigStrategy::None`].
    pub fn resource_set<A: DeviceAccessor + ?Sized>(
        &self,
        accessor: &A,
    ) -> crate::Result<ResourceSet> {
        let mut resources = ResourceSet::new();
        if matches!(self, MigStrategy::None) {
            return Ok(resources);
        }
        for mig in collect_mig_devices(accessor)? {
            resources.insert(self.resource_name(accessor, mig)?);
        }
        Ok(resources)
    }
}

pub fn single_resource_name(attributes: &PartitionAttributes) -> String {
    format!(
        "mig-{}c.{}g.{}gb",
        attributes.compute_slices,
        attributes.instance_slices,
        attributes.memory_gb()
    )
}

pub fn mixed_resource_name(attributes: &PartitionAttributes) -> String {
    format!(
        "mig-{}g.{}gb",
        attributes.instance_slices,
        attributes.memory_gb()
    )
}

pub fn memory_resource_name(attributes: &PartitionAttributes) -> String {
    format!("mig-{}gb", attributes.memory_gb())
}

impl FromStr for MigStrategy {
    type Err = MigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MIG_STRATEGY_NONE => Ok(MigStrategy::None),
            MIG_STRATEGY_SINGLE => Ok(MigStrategy::Single),
            MIG_STRATEGY_MIXED => Ok(MigStrategy::Mixed),
            MIG_STRATEGY_MIXED_MEMORY_QUALIFIED => Ok(MigStrategy::MixedMemoryQualified),
            MIG_STRATEGY_MIXED_FRACTIONALLY_QUALIFIED => Ok(
                MigStrategy::MixedFractionallyQualified(FractionTable::default()),
            ),
            _ => Err(MigError::UnknownStrategy {
                strategy: s.to_string(),
            }),
        }
    }
}

impl Display for MigStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
