//! The closed set of routable resource paths.

use std::fmt;
use std::str::FromStr;

use crate::catalog::TransactionTable;

/// Logical query selected by the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourcePath {
    MerchantDetails,
    MerchantStats,
    FilterMerchantStats,
    FilterMerchantField,
    SearchMerchants,
    /// Authorization by id, or by merchant and date window.
    Authorizations,
    /// Settlement by id, or by merchant and date window.
    Settlements,
    FilterTransactions,
}

/// Returned when a request path names no resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Path not found: {0}")]
pub struct UnknownResource(pub String);

impl ResourcePath {
    pub const ALL: [ResourcePath; 8] = [
        ResourcePath::MerchantDetails,
        ResourcePath::MerchantStats,
        ResourcePath::FilterMerchantStats,
        ResourcePath::FilterMerchantField,
        ResourcePath::SearchMerchants,
        ResourcePath::Authorizations,
        ResourcePath::Settlements,
        ResourcePath::FilterTransactions,
    ];

    /// Canonical request path.
    pub fn path(&self) -> &'static str {
        match self {
            ResourcePath::MerchantDetails => "/api/merchant/details",
            ResourcePath::MerchantStats => "/api/merchant/stats",
            ResourcePath::FilterMerchantStats => "/api/merchant/filter-stats",
            ResourcePath::FilterMerchantField => "/api/merchant/filter-data",
            ResourcePath::SearchMerchants => "/api/merchant/search",
            ResourcePath::Authorizations => "/api/transaction/authorization",
            ResourcePath::Settlements => "/api/transaction/settlement",
            ResourcePath::FilterTransactions => "/api/transaction/filter",
        }
    }

    /// The transaction table behind a per-table resource.
    pub fn transaction_table(&self) -> Option<TransactionTable> {
        match self {
            ResourcePath::Authorizations => Some(TransactionTable::Authorizations),
            ResourcePath::Settlements => Some(TransactionTable::Settlements),
            _ => None,
        }
    }
}

impl FromStr for ResourcePath {
    type Err = UnknownResource;

    /// Case-insensitive match on the full path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.path() == lowered)
            .ok_or(UnknownResource(lowered))
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
