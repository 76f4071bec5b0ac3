//! Upstream asset type labels.

use crate::models::AssetClass;

/// Known upstream labels. Matching ignores ASCII case.
pub const ASSET_TYPE_LABELS: &[(&str, AssetClass)] = &[
    ("Equity", AssetClass::Stock),
    ("ETF", AssetClass::Stock),
    ("Mutual Fund", AssetClass::Stock),
    ("Common Stock", AssetClass::Stock),
    ("Cryptocurrency", AssetClass::Crypto),
    ("Digital Currency", AssetClass::Crypto),
    ("Crypto", AssetClass::Crypto),
    ("Index", AssetClass::Index),
];

/// Map an upstream type label to an asset class. Unknown labels are stocks.
pub fn classify(label: &str) -> AssetClass {
    let label = label.trim();
    ASSET_TYPE_LABELS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(label))
        .map(|(_, asset_class)| *asset_class)
        .unwrap_or(AssetClass::Stock)
}
