use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigError {
    #[error("Unknown MIG strategy: {strategy}")]
    UnknownStrategy { strategy: String },
    #[error(
        "MIG strategy '{strategy}' requires exactly one MIG device type on the node, found {}: [{}]",
        .resources.len(),
        .resources.join(", ")
    )]
    HeterogeneousMigConfiguration {
        strategy: String,
        resources: Vec<String>,
    },
    #[error(
        "MIG strategy '{strategy}' does not support a MIG device with {instance_slices} GPU instance slice(s) on a GPU with at most {max_partitions} MIG devices"
    )]
    UnsupportedPartitionSize {
        strategy: String,
        instance_slices: u32,
        max_partitions: u32,
    },
    #[error("Device attribute query failed: {0}")]
    AttributeQuery(String),
    #[error("Invalid resource name '{0}'")]
    InvalidResourceName(String),
    #[error("Invalid fraction table: {0}")]
    InvalidFractionTable(String),
}

impl From<String> for MigError {
    fn from(e: String) -> Self {
        Self::AttributeQuery(e)
    }
}

impl From<&str> for MigError {
    fn from(e: &str) -> Self {
        Self::AttributeQuery(e.to_string())
    }
}
