//! Payload types returned by the remote search API

use serde::{Deserialize, Serialize};

/// One catalogue row in a search page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartItem {
    pub part_number: String,
    pub supplier_sku: String,
    pub description: String,
    pub branch: String,
    pub available_qty: i64,
}

/// One page of search results together with the overall match count
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<PartItem>,
}

impl SearchPage {
    pub fn new(total: u64, items: Vec<PartItem>) -> Self {
        Self { total, items }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchQuantity {
    pub branch: String,
    pub qty: i64,
}

/// Per-branch availability of a single part, largest quantity first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakAvailability {
    pub part_number: String,
    pub total_available: i64,
    #[serde(default)]
    pub branches: Vec<BranchQuantity>,
}

impl PeakAvailability {
    /// Orders branches by quantity descending; equal quantities keep their received order
    pub fn sorted_by_quantity(mut self) -> Self {
        self.branches.sort_by(|a, b| b.qty.cmp(&a.qty));
        self
    }

    /// Branch holding the most stock, if any
    pub fn peak(&self) -> Option<&BranchQuantity> {
        self.branches.iter().max_by_key(|b| b.qty)
    }
}
