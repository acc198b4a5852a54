//! Recorded snapshot of the GPUs of a node.
//!
//! The snapshot implements [`DeviceAccessor`], so strategies can be evaluated
//! without access to the GPU driver.

use std::path::Path;

use migstrat::fraction::AMPERE_MAX_PARTITIONS;
use migstrat::{Accelerator, DeviceAccessor, MigError, Partition, PartitionAttributes};
use serde::{Deserialize, Serialize};

use crate::common::error::error;

fn default_max_partitions() -> u32 {
    AMPERE_MAX_PARTITIONS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MigRecord {
    pub compute_slices: u32,
    pub instance_slices: u32,
    pub memory_mb: u64,
}

impl From<&MigRecord> for PartitionAttributes {
    fn from(record: &MigRecord) -> Self {
        PartitionAttributes::new(
            record.compute_slices,
            record.instance_slices,
            record.memory_mb,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GpuRecord {
    #[serde(default)]
    pub mig_enabled: bool,
    #[serde(default = "default_max_partitions")]
    pub max_partitions: u32,
    #[serde(default, rename = "mig")]
    pub migs: Vec<MigRecord>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeTopology {
    #[serde(default, rename = "gpu")]
    pub gpus: Vec<GpuRecord>,
}

impl NodeTopology {
    pub fn parse(input: &str) -> crate::Result<NodeTopology> {
        let topology: NodeTopology = toml::from_str(input)?;
        topology.validate()?;
        Ok(topology)
    }

    pub fn load(path: &Path) -> crate::Result<NodeTopology> {
        log::debug!("Loading node topology from {}", path.display());
        let topology = Self::parse(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Node topology has {} GPU(s), {} with MIG enabled",
            topology.gpus.len(),
            topology.gpus.iter().filter(|g| g.mig_enabled).count()
        );
        Ok(topology)
    }

    fn validate(&self) -> crate::Result<()> {
        for (gpu_index, gpu) in self.gpus.iter().enumerate() {
            if gpu.max_partitions == 0 {
                return error(format!("GPU {gpu_index}: max-partitions has to be positive"));
            }
            if gpu.migs.len() > gpu.max_partitions as usize {
                return error(format!(
                    "GPU {gpu_index} has {} MIG devices, but supports at most {}",
                    gpu.migs.len(),
                    gpu.max_partitions
                ));
            }
            if !gpu.mig_enabled && !gpu.migs.is_empty() {
                log::warn!("GPU {gpu_index} has MIG devices, but MIG mode is disabled; they will be ignored");
            }
            for (mig_index, mig) in gpu.migs.iter().enumerate() {
                if mig.instance_slices == 0 || mig.instance_slices > gpu.max_partitions {
                    return error(format!(
                        "MIG device {gpu_index}:{mig_index}: instance-slices has to be between 1 and {}",
                        gpu.max_partitions
                    ));
                }
                if mig.compute_slices == 0 || mig.compute_slices > mig.instance_slices {
                    return error(format!(
                        "MIG device {gpu_index}:{mig_index}: compute-slices has to be between 1 and instance-slices ({})",
                        mig.instance_slices
                    ));
                }
            }
        }
        Ok(())
    }

    fn get_gpu(&self, gpu: u32) -> migstrat::Result<&GpuRecord> {
        self.gpus
            .get(gpu as usize)
            .ok_or_else(|| MigError::AttributeQuery(format!("GPU {gpu} does not exist")))
    }

    fn get_mig(&self, mig: Partition) -> migstrat::Result<&MigRecord> {
        self.get_gpu(mig.gpu)?
            .migs
            .get(mig.index as usize)
            .ok_or_else(|| MigError::AttributeQuery(format!("MIG device {mig} does not exist")))
    }
}

impl DeviceAccessor for NodeTopology {
    fn accelerators(&self) -> migstrat::Result<Vec<Accelerator>> {
        Ok((0..self.gpus.len() as u32).map(Accelerator::new).collect())
    }

    fn is_mig_enabled(&self, gpu: Accelerator) -> migstrat::Result<bool> {
        Ok(self.get_gpu(gpu.index)?.mig_enabled)
    }

    fn partitions(&self, gpu: Accelerator) -> migstrat::Result<Vec<Partition>> {
        let record = self.get_gpu(gpu.index)?;
        Ok((0..record.migs.len() as u32)
            .map(|index| Partition::new(gpu.index, index))
            .collect())
    }

    fn attributes(&self, mig: Partition) -> migstrat::Result<PartitionAttributes> {
        self.get_mig(mig).map(PartitionAttributes::from)
    }

    fn parent(&self, mig: Partition) -> migstrat::Result<Accelerator> {
        self.get_mig(mig)?;
        Ok(Accelerator::new(mig.gpu))
    }

    fn max_partitions(&self, gpu: Accelerator) -> migstrat::Result<u32> {
        Ok(self.get_gpu(gpu.index)?.max_partitions)
    }
}
