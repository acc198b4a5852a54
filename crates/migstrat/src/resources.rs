use crate::MigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

const MAX_RESOURCE_NAME_LENGTH: usize = 63;

/// Suffix of an extended resource name, e.g. `mig-3g.20gb` in `nvidia.com/mig-3g.20gb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if is_valid_resource_name(&name) {
            Ok(Self(name))
        } else {
            Err(MigError::InvalidResourceName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_resource_name(name: &str) -> bool {
    let is_alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    !name.is_empty()
        && name.len() <= MAX_RESOURCE_NAME_LENGTH
        && name.chars().all(|c| is_alnum(c) || c == '.' || c == '-')
        && name.starts_with(is_alnum)
        && name.ends_with(is_alnum)
}

impl Display for ResourceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ResourceName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<String> for ResourceName {
    type Error = MigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}

/// Distinct resource names found on the node, in sorted order.
pub type ResourceSet = BTreeSet<ResourceName>;
