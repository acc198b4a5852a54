use std::path::Path;

use migstrat::strategy::MIG_STRATEGY_NONE;
use migstrat::{FractionRow, FractionTable, MigStrategy};
use serde::Deserialize;

/// Strategy used when neither the command line nor the configuration file selects one.
pub const DEFAULT_MIG_STRATEGY: &str = MIG_STRATEGY_NONE;

/// Contents of the agent configuration file.
///
/// ```toml
/// mig-strategy = "mixed-fractionally-qualified"
///
/// [[fraction]]
/// max-partitions = 15
/// half = 7
/// quarter = 4
/// eighth = 2
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AgentConfig {
    pub mig_strategy: Option<String>,
    #[serde(default)]
    pub fraction: Vec<FractionRow>,
}

impl AgentConfig {
    pub fn parse(input: &str) -> crate::Result<AgentConfig> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> crate::Result<AgentConfig> {
        log::debug!("Loading configuration from {}", path.display());
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Selects the strategy; `cli_strategy` takes precedence over the configuration file.
    ///
    /// Fraction rows from the file are validated here, even if the selected strategy
    /// does not use them.
    pub fn resolve_strategy(&self, cli_strategy: Option<&str>) -> crate::Result<MigStrategy> {
        let name = cli_strategy
            .or(self.mig_strategy.as_deref())
            .unwrap_or(DEFAULT_MIG_STRATEGY);
        let strategy: MigStrategy = name.parse()?;

        let mut table = FractionTable::default();
        table.extend(self.fraction.iter().copied())?;

        log::debug!("Selected MIG strategy '{strategy}'");
        Ok(strategy.with_fraction_table(table))
    }
}
