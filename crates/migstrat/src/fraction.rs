//! Classification of MIG devices into fractions of their parent GPU.
//!
//! A GPU with `max_partitions` possible MIG devices has one row in [`FractionTable`]
//! that lists how many GPU instance slices make up a half, a quarter and an eighth
//! of it. New GPU generations are supported by adding rows, not by changing code.

use crate::MigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Maximum number of MIG devices of an Ampere GPU (A100).
pub const AMPERE_MAX_PARTITIONS: u32 = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fraction {
    Half,
    Quarter,
    Eighth,
}

impl Fraction {
    pub fn resource_name(&self) -> &'static str {
        match self {
            Fraction::Half => "mig-half",
            Fraction::Quarter => "mig-quarter",
            Fraction::Eighth => "mig-eighth",
        }
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resource_name())
    }
}

/// GPU instance slice counts of each fraction for one `max_partitions` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FractionRow {
    pub max_partitions: u32,
    pub half: u32,
    pub quarter: u32,
    pub eighth: u32,
}

impl FractionRow {
    /// Derives the row of a GPU with 7 slices: (max+1)/2 - 1, (max+1)/4 and (max+1)/8.
    pub fn ampere() -> Self {
        let slots = AMPERE_MAX_PARTITIONS + 1;
        Self {
            max_partitions: AMPERE_MAX_PARTITIONS,
            half: slots / 2 - 1,
            quarter: slots / 4,
            eighth: slots / 8,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        let FractionRow {
            max_partitions,
            half,
            quarter,
            eighth,
        } = *self;
        if max_partitions == 0 {
            return Err(MigError::InvalidFractionTable(
                "max-partitions has to be positive".to_string(),
            ));
        }
        if eighth == 0 || !(eighth < quarter && quarter < half) {
            return Err(MigError::InvalidFractionTable(format!(
                "row for max-partitions {max_partitions} has to satisfy 0 < eighth < quarter < half, got {eighth}/{quarter}/{half}"
            )));
        }
        if half > max_partitions {
            return Err(MigError::InvalidFractionTable(format!(
                "half ({half}) exceeds max-partitions ({max_partitions})"
            )));
        }
        Ok(())
    }

    fn classify(&self, instance_slices: u32) -> Option<Fraction> {
        if instance_slices == self.half {
            Some(Fraction::Half)
        } else if instance_slices == self.quarter {
            Some(Fraction::Quarter)
        } else if instance_slices == self.eighth {
            Some(Fraction::Eighth)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionTable {
    rows: BTreeMap<u32, FractionRow>,
}

impl FractionTable {
    /// Builds a table from the given rows. A later row replaces an earlier one
    /// with the same `max_partitions`.
    pub fn new(rows: impl IntoIterator<Item = FractionRow>) -> crate::Result<Self> {
        let mut table = Self {
            rows: BTreeMap::new(),
        };
        table.extend(rows)?;
        Ok(table)
    }

    /// Adds rows on top of the existing ones, e.g. rows read from configuration.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = FractionRow>) -> crate::Result<()> {
        for row in rows {
            row.validate()?;
            self.rows.insert(row.max_partitions, row);
        }
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &FractionRow> {
        self.rows.values()
    }

    /// Returns `None` if the table has no row for `max_partitions` or the slice
    /// count is none of the row's fractions.
    pub fn classify(&self, instance_slices: u32, max_partitions: u32) -> Option<Fraction> {
        self.rows
            .get(&max_partitions)
            .and_then(|row| row.classify(instance_slices))
    }
}

impl Default for FractionTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::from([(AMPERE_MAX_PARTITIONS, FractionRow::ampere())]),
        }
    }
}
