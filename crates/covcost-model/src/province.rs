//! Urbanization lookup table keyed by province name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// 2020 census urbanization rates (percent), keyed by English province name.
const DEFAULT_URBANIZATION: [(&str, f64); 31] = [
    ("Shanghai", 89.46),
    ("Beijing", 87.83),
    ("Tianjin", 85.49),
    ("Guangdong", 75.42),
    ("Jiangsu", 75.04),
    ("Zhejiang", 74.23),
    ("Liaoning", 73.51),
    ("Chongqing", 71.67),
    ("Fujian", 71.04),
    ("Neimenggu", 69.58),
    ("Ningxia", 67.31),
    ("Heilongjiang", 67.11),
    ("Shandong", 65.53),
    ("Hubei", 65.47),
    ("Shaanxi", 65.16),
    ("Shanxi", 64.97),
    ("Jilin", 64.73),
    ("Jiangxi", 63.13),
    ("Qinghai", 62.80),
    ("Hebei", 62.77),
    ("Hainan", 62.46),
    ("Anhui", 61.51),
    ("Hunan", 61.16),
    ("Sichuan", 59.49),
    ("Xinjiang", 59.24),
    ("Henan", 58.08),
    ("Guangxi", 56.78),
    ("Guizhou", 55.94),
    ("Gansu", 55.49),
    ("Yunnan", 52.92),
    ("Xizang", 38.88),
];

/// Province used as the low-urbanization example in interpretations.
pub const LOW_URBANIZATION_EXAMPLE: &str = "Gansu";
/// Province used as the high-urbanization example in interpretations.
pub const HIGH_URBANIZATION_EXAMPLE: &str = "Shanghai";

/// Time-invariant urbanization rate per province name.
///
/// Names are matched exactly, the way the join key is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrbanizationTable {
    rates: BTreeMap<String, f64>,
}

impl Default for UrbanizationTable {
    fn default() -> Self {
        Self {
            rates: DEFAULT_URBANIZATION
                .iter()
                .map(|(name, rate)| ((*name).to_string(), *rate))
                .collect(),
        }
    }
}

impl UrbanizationTable {
    /// Build a table from explicit entries, rejecting rates outside 0..=100.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut rates = BTreeMap::new();
        for (name, rate) in entries {
            let name = name.into();
            if !(0.0..=100.0).contains(&rate) || rate.is_nan() {
                return Err(ModelError::InvalidUrbanizationRate {
                    province: name,
                    value: rate,
                });
            }
            rates.insert(name, rate);
        }
        Ok(Self { rates })
    }

    pub fn rate(&self, province_name: &str) -> Option<f64> {
        self.rates.get(province_name).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(name, rate)| (name.as_str(), *rate))
    }
}
