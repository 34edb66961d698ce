use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ASSET_RE: Regex =
        Regex::new(r"(?i)\b(BTC|ETH|SOL|AVAX|MATIC|ARB|DOGE|ADA|DOT|LINK)\b")
            .expect("valid asset regex");
    static ref TIMEFRAME_RE: Regex =
        Regex::new(r"(?i)\b(1h|4h|1d|1w|1M)\b").expect("valid timeframe regex");
}

pub const DEFAULT_ASSET: &str = "BTC";
pub const DEFAULT_TIMEFRAME: &str = "1d";

/// First allow-listed ticker in the query, uppercased. Defaults to BTC.
pub fn extract_asset(query: &str) -> String {
    ASSET_RE
        .find(query)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| DEFAULT_ASSET.to_string())
}

/// First allow-listed timeframe token in the query. Defaults to 1d.
pub fn extract_timeframe(query: &str) -> String {
    TIMEFRAME_RE
        .find(query)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string())
}

/// Reference spot price for the synthetic technical path. Stands in for a
/// real price feed.
pub fn reference_price(asset: &str) -> f64 {
    match asset {
        "BTC" => 45_000.0,
        "ETH" => 3_000.0,
        "SOL" => 180.0,
        "AVAX" => 45.0,
        "MATIC" => 1.2,
        "ARB" => 2.1,
        _ => 45_000.0,
    }
}
