use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use crate::{Bucket, Percent};

/// Target share of the total for each bucket. The three shares add up to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub bonds: Percent,
    pub international: Percent,
    pub national: Percent,
}

impl Allocation {
    pub fn get(&self, bucket: Bucket) -> Percent {
        match bucket {
            Bucket::Bonds => self.bonds,
            Bucket::International => self.international,
            Bucket::National => self.national,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum AllocationPolicy {
    #[value(name = "target-2020")]
    #[serde(rename = "target-2020")]
    Target2020,
    #[value(name = "target-2030")]
    #[serde(rename = "target-2030")]
    Target2030,
    #[value(name = "all-bonds")]
    #[serde(rename = "all-bonds")]
    AllBonds,
}

impl AllocationPolicy {
    /// Picks a policy from the export's file name. `"202"` is checked before `"203"`.
    pub fn from_filename(name: &str) -> Self {
        let policy = if name.contains("202") {
            AllocationPolicy::Target2020
        } else if name.contains("203") {
            AllocationPolicy::Target2030
        } else {
            AllocationPolicy::AllBonds
        };
        debug!(name, ?policy, "selected allocation policy from file name");
        policy
    }

    pub fn allocation(&self) -> Allocation {
        match self {
            AllocationPolicy::Target2020 => Allocation {
                bonds: 0.10,
                international: 0.30,
                national: 0.60,
            },
            AllocationPolicy::Target2030 => Allocation {
                bonds: 0.30,
                international: 0.27,
                national: 0.43,
            },
            AllocationPolicy::AllBonds => Allocation {
                bonds: 1.0,
                international: 0.0,
                national: 0.0,
            },
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}
