use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Ordinal of a physical GPU on the node.
pub type GpuIndex = u32;
/// Ordinal of a MIG device within its parent GPU.
pub type MigIndex = u32;

/// Handle of a physical GPU.
///
/// Handles carry no state; every attribute is fetched through a [`DeviceAccessor`],
/// so a handle stays valid only for as long as the enumeration that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accelerator {
    pub index: GpuIndex,
}

impl Accelerator {
    pub fn new(index: GpuIndex) -> Self {
        Self { index }
    }
}

impl Display for Accelerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Handle of a MIG device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition {
    pub gpu: GpuIndex,
    pub index: MigIndex,
}

impl Partition {
    pub fn new(gpu: GpuIndex, index: MigIndex) -> Self {
        Self { gpu, index }
    }
}

/// Formats the partition as `<gpu>:<mig>`, the form accepted by `NVIDIA_VISIBLE_DEVICES`.
impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.gpu, self.index)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionAttributes {
    pub compute_slices: u32,
    pub instance_slices: u32,
    pub memory_mb: u64,
}

impl PartitionAttributes {
    pub fn new(compute_slices: u32, instance_slices: u32, memory_mb: u64) -> Self {
        Self {
            compute_slices,
            instance_slices,
            memory_mb,
        }
    }

    /// Memory size rounded up to whole (decimal) gigabytes.
    pub fn memory_gb(&self) -> u64 {
        self.memory_mb.div_ceil(1000)
    }
}

/// Read-only view of the GPUs present on a node.
///
/// Implementations are expected to answer from local hardware state, synchronously.
/// Any failure is reported as [`crate::MigError::AttributeQuery`] and is not retried.
pub trait DeviceAccessor {
    fn accelerators(&self) -> crate::Result<Vec<Accelerator>>;

    fn is_mig_enabled(&self, gpu: Accelerator) -> crate::Result<bool>;

    fn partitions(&self, gpu: Accelerator) -> crate::Result<Vec<Partition>>;

    fn attributes(&self, mig: Partition) -> crate::Result<PartitionAttributes>;

    fn parent(&self, mig: Partition) -> crate::Result<Accelerator>;

    /// Maximum number of MIG devices the GPU can be split into.
    fn max_partitions(&self, gpu: Accelerator) -> crate::Result<u32>;
}

/// Returns all MIG devices of all MIG-enabled GPUs on the node.
pub fn collect_mig_devices<A: DeviceAccessor + ?Sized>(
    accessor: &A,
) -> crate::Result<Vec<Partition>> {
    let mut migs = Vec::new();
    for gpu in accessor.accelerators()? {
        if !accessor.is_mig_enabled(gpu)? {
            continue;
        }
        migs.extend(accessor.partitions(gpu)?);
    }
    Ok(migs)
}
