//! Tiered per-mile rates for mileage pay.

/// Upper bound (inclusive) of a tier and the rate paid on every mile of a
/// trip that falls into it. The last tier is open-ended.
const TIERS: [(f64, f64); 3] = [(200.0, 2.00), (400.0, 1.37), (600.0, 1.13)];
const LONG_HAUL_RATE: f64 = 1.02;

/// Per-mile rate for a trip of `total_miles`. First matching tier wins.
///
/// Fractional mileage between tiers (e.g. 200.5) belongs to the higher tier.
pub fn rate_for_miles(total_miles: f64) -> f64 {
    if total_miles.is_nan() || total_miles <= 0.0 {
        return 0.0;
    }

    TIERS
        .iter()
        .find(|(upper, _)| total_miles <= *upper)
        .map(|(_, rate)| *rate)
        .unwrap_or(LONG_HAUL_RATE)
}
