use crate::aggregator::UsageAccumulator;
use crate::error::UsageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Metric used to weight languages against each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Total measured line count of the attributed files
    #[default]
    Lines,
    /// Byte counts declared by the API's per-repository language maps
    Bytes,
}

impl Weighting {
    /// Lowercase name, as accepted by the CLI and config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weighting {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "bytes" => Ok(Self::Bytes),
            other => Err(UsageError::Config(format!(
                "Unknown weighting '{}', expected 'lines' or 'bytes'",
                other
            ))),
        }
    }
}

/// Percentage share per language, rounded to two decimals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDistribution(BTreeMap<String, f64>);

impl UsageDistribution {
    /// Builds a distribution from raw weights
    ///
    /// Shares are apportioned in hundredths of a percent by largest remainder,
    /// so they always sum to exactly 100.00. When the weights sum to zero the
    /// distribution is empty.
    pub fn from_weights<'a, I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let weights: Vec<(&str, u64)> = weights.into_iter().collect();
        let total: u128 = weights.iter().map(|(_, w)| u128::from(*w)).sum();
        if total == 0 {
            return Self::default();
        }

        // (language, floored hundredths, remainder over `total`)
        let mut shares: Vec<(&str, u128, u128)> = weights
            .into_iter()
            .map(|(language, weight)| {
                let scaled = u128::from(weight) * HUNDREDTHS;
                (language, scaled / total, scaled % total)
            })
            .collect();

        let assigned: u128 = shares.iter().map(|(_, units, _)| units).sum();
        let leftover = (HUNDREDTHS - assigned) as usize;
        shares.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
        for share in shares.iter_mut().take(leftover) {
            share.1 += 1;
        }

        let mut distribution = BTreeMap::new();
        for (language, units, _) in shares {
            *distribution.entry(language.to_string()).or_insert(0.0) += units as f64 / 100.0;
        }
        Self(distribution)
    }

    /// Share of one language
    pub fn get(&self, language: &str) -> Option<f64> {
        self.0.get(language).copied()
    }

    /// Iterates languages in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries ordered by share, largest first, then by name
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Sum of all shares
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Number of languages
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there is nothing to distribute
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turns accumulated totals into a percentage distribution
pub fn calculate(accumulator: &UsageAccumulator, weighting: Weighting) -> UsageDistribution {
    match weighting {
        Weighting::Lines => UsageDistribution::from_weights(
            accumulator
                .languages()
                .iter()
                .map(|(language, stats)| (language.as_str(), stats.total_lines)),
        ),
        Weighting::Bytes => UsageDistribution::from_weights(
            accumulator
                .declared_bytes()
                .iter()
                .map(|(language, bytes)| (language.as_str(), *bytes)),
        ),
    }
}

/// 100% expressed in hundredths of a percent
const HUNDREDTHS: u128 = 10_000;
