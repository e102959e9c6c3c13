use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{FinancialStats, ProfileWithOwner};

/// Query string accepted by the search endpoint.
///
/// `industry` and `location` are accepted but not applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub incorporation_type: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

/// Descending sort keys over the financial stats block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Revenue,
    Cagr,
    Roi,
    ProfitMargin,
}

impl SortKey {
    /// Missing key defaults to revenue; an unknown key yields `None` (store order).
    pub fn parse(raw: Option<&str>) -> Option<SortKey> {
        match raw.unwrap_or("revenue") {
            "revenue" => Some(SortKey::Revenue),
            "cagr" => Some(SortKey::Cagr),
            "roi" => Some(SortKey::Roi),
            "profitMargin" => Some(SortKey::ProfitMargin),
            _ => None,
        }
    }

    fn value(&self, stats: Option<&FinancialStats>) -> Option<f64> {
        let stats = stats?;
        match self {
            SortKey::Revenue => stats.revenue.as_ref().and_then(|r| r.latest_amount()),
            SortKey::Cagr => stats.cagr,
            SortKey::Roi => stats.roi,
            SortKey::ProfitMargin => stats.profit_margin,
        }
    }
}

/// Stable descending sort; profiles without a value go last in their original order.
pub fn sort_profiles(items: &mut [ProfileWithOwner], key: SortKey) {
    items.sort_by(|a, b| {
        let va = key.value(a.profile.financial_stats.as_ref());
        let vb = key.value(b.profile.financial_stats.as_ref());
        match (va, vb) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
