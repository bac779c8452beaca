//! Operator-facing number formatting.

use ballot_types::U256;

/// Wei per ether.
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Render a wei amount as ether with no trailing zeros, e.g. `1.5` or `0.000001`.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let frac = wei % unit;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
