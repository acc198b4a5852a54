use crate::device::{Accelerator, DeviceAccessor, Partition, PartitionAttributes};
use crate::MigError;
use derive_builder::Builder;

pub use TestGpuConfigBuilder as GpuBuilder;

#[derive(Builder, Clone)]
#[builder(pattern = "owned", derive(Clone))]
pub struct TestGpuConfig {
    #[builder(default)]
    mig_enabled: bool,
    #[builder(default = "7")]
    max_partitions: u32,
    #[builder(default)]
    migs: Vec<PartitionAttributes>,
}

impl TestGpuConfigBuilder {
    /// Adds a MIG device and enables MIG mode on the GPU.
    pub fn mig(mut self, compute_slices: u32, instance_slices: u32, memory_mb: u64) -> Self {
        self.migs
            .get_or_insert_with(Vec::new)
            .push(PartitionAttributes::new(
                compute_slices,
                instance_slices,
                memory_mb,
            ));
        self.mig_enabled = Some(true);
        self
    }

    pub fn finish(self) -> TestGpuConfig {
        self.build().unwrap()
    }
}

pub fn gpu() -> GpuBuilder {
    GpuBuilder::default()
}

/// In-memory node used in place of a real device query layer.
#[derive(Clone, Default)]
pub struct TestNode {
    gpus: Vec<TestGpuConfig>,
    broken_attributes: bool,
}

impl TestNode {
    pub fn new(gpus: Vec<GpuBuilder>) -> Self {
        Self {
            gpus: gpus.into_iter().map(|g| g.finish()).collect(),
            broken_attributes: false,
        }
    }

    /// Makes every attribute query fail.
    pub fn break_attributes(mut self) -> Self {
        self.broken_attributes = true;
        self
    }

    pub fn reversed(&self) -> Self {
        let mut gpus = self.gpus.clone();
        gpus.reverse();
        for gpu in gpus.iter_mut() {
            gpu.migs.reverse();
        }
        Self {
            gpus,
            broken_attributes: self.broken_attributes,
        }
    }

    fn get_gpu(&self, index: u32) -> crate::Result<&TestGpuConfig> {
        self.gpus
            .get(index as usize)
            .ok_or_else(|| MigError::AttributeQuery(format!("GPU {index} not found")))
    }
}

impl DeviceAccessor for TestNode {
    fn accelerators(&self) -> crate::Result<Vec<Accelerator>> {
        Ok((0..self.gpus.len() as u32).map(Accelerator::new).collect())
    }

    fn is_mig_enabled(&self, gpu: Accelerator) -> crate::Result<bool> {
        Ok(self.get_gpu(gpu.index)?.mig_enabled)
    }

    fn partitions(&self, gpu: Accelerator) -> crate::Result<Vec<Partition>> {
        let config = self.get_gpu(gpu.index)?;
        Ok((0..config.migs.len() as u32)
            .map(|i| Partition::new(gpu.index, i))
            .collect())
    }

    fn attributes(&self, mig: Partition) -> crate::Result<PartitionAttributes> {
        if self.broken_attributes {
            return Err(format!("cannot read attributes of MIG device {mig}").into());
        }
        self.get_gpu(mig.gpu)?
            .migs
            .get(mig.index as usize)
            .copied()
            .ok_or_else(|| format!("MIG device {mig} not found").into())
    }

    fn parent(&self, mig: Partition) -> crate::Result<Accelerator> {
        self.get_gpu(mig.gpu)?;
        Ok(Accelerator::new(mig.gpu))
    }

    fn max_partitions(&self, gpu: Accelerator) -> crate::Result<u32> {
        Ok(self.get_gpu(gpu.index)?.max_partitions)
    }
}

/// A100-40GB MIG profiles as reported by the driver: (compute slices, instance slices, memory MB).
pub const PROFILE_1G_5GB: (u32, u32, u64) = (1, 1, 4864);
pub const PROFILE_2G_10GB: (u32, u32, u64) = (2, 2, 9856);
pub const PROFILE_3G_20GB: (u32, u32, u64) = (3, 3, 19968);
pub const PROFILE_7G_40GB: (u32, u32, u64) = (7, 7, 39936);

pub fn with_profile(builder: GpuBuilder, profile: (u32, u32, u64)) -> GpuBuilder {
    builder.mig(profile.0, profile.1, profile.2)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
