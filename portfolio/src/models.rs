use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Latest quotes keyed by asset identifier.
pub type QuoteMap = HashMap<String, Quote>;

/// One holding: how much of which asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub asset_id: String,
    pub amount: f64,
}

impl PortfolioEntry {
    pub fn new(asset_id: impl Into<String>, amount: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            amount,
        }
    }

    fn validate(&self) -> Result<(), PortfolioError> {
        if self.asset_id.trim().is_empty() {
            return Err(PortfolioError::InvalidEntry("empty asset id".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(PortfolioError::InvalidEntry(format!(
                "{}: amount must be a finite, non-negative number (got {})",
                self.asset_id, self.amount
            )));
        }
        Ok(())
    }
}

/// Parses `ASSET=AMOUNT`, e.g. `BTC=0.5`.
impl FromStr for PortfolioEntry {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (asset, amount) = s
            .split_once('=')
            .ok_or_else(|| PortfolioError::InvalidEntry(format!("expected ASSET=AMOUNT, got {s:?}")))?;

        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| PortfolioError::InvalidEntry(format!("{s:?}: amount is not a number")))?;

        let entry = Self::new(asset.trim().to_uppercase(), amount);
        entry.validate()?;
        Ok(entry)
    }
}

/// Ordered collection of holdings. Entry order is display order.
///
/// Deserializing goes through [`Portfolio::new`], so a decoded portfolio is
/// always valid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPortfolio")]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

/// Wire shape of a portfolio document, before validation.
#[derive(Deserialize)]
struct RawPortfolio {
    entries: Vec<PortfolioEntry>,
}

impl TryFrom<RawPortfolio> for Portfolio {
    type Error = PortfolioError;

    fn try_from(raw: RawPortfolio) -> Result<Self, Self::Error> {
        Self::new(raw.entries)
    }
}

impl Portfolio {
    /// Build a portfolio, rejecting invalid amounts and duplicate assets.
    pub fn new(entries: Vec<PortfolioEntry>) -> Result<Self, PortfolioError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.asset_id.as_str()) {
                return Err(PortfolioError::DuplicateAsset(entry.asset_id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON document of the form `{"entries": [{"asset_id": .., "amount": ..}]}`.
    pub fn from_json(json: &str) -> Result<Self, PortfolioError> {
        let raw: RawPortfolio = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Asset identifiers in entry order.
    pub fn asset_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.asset_id.clone()).collect()
    }
}

/// Market quote for one asset.
///
/// `percent_change` is a fraction: `0.01` means +1%.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl Quote {
    pub fn new(price: f64, change: f64, percent_change: f64) -> Self {
        Self {
            price,
            change,
            percent_change,
        }
    }
}
