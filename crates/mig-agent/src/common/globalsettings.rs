use std::path::PathBuf;

use anyhow::Context;
use migstrat::MigStrategy;

use crate::common::config::AgentConfig;
use crate::output::outputs::Output;
use crate::topology::NodeTopology;

pub struct GlobalSettings {
    mig_strategy: Option<String>,
    topology: Option<PathBuf>,
    config: Option<PathBuf>,
    printer: Box<dyn Output>,
}

impl GlobalSettings {
    pub fn new(
        mig_strategy: Option<String>,
        topology: Option<PathBuf>,
        config: Option<PathBuf>,
        printer: Box<dyn Output>,
    ) -> Self {
        GlobalSettings {
            mig_strategy,
            topology,
            config,
            printer,
        }
    }

    pub fn printer(&self) -> &dyn Output {
        self.printer.as_ref()
    }

    /// Resolves the MIG strategy from the command line and the configuration file.
    pub fn mig_strategy(&self) -> anyhow::Result<MigStrategy> {
        let config = match &self.config {
            Some(path) => AgentConfig::load(path)
                .with_context(|| format!("Cannot load configuration from {}", path.display()))?,
            None => AgentConfig::default(),
        };
        Ok(config.resolve_strategy(self.mig_strategy.as_deref())?)
    }

    pub fn node_topology(&self) -> anyhow::Result<NodeTopology> {
        let path = self.topology.as_ref().ok_or_else(|| {
            anyhow::anyhow!("No node topology was given, use --topology or MIG_AGENT_TOPOLOGY")
        })?;
        NodeTopology::load(path)
            .with_context(|| format!("Cannot load node topology from {}", path.display()))
    }
}
