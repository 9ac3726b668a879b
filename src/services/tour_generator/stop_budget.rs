/// Maximum number of stops that fit a tour of `tour_length_minutes`.
///
/// `viewing_share_pct` of the tour goes to looking at art, each stop costing
/// `viewing_minutes_per_stop`; the rest is left for walking, which is only
/// known once directions come back. Lengths too short for a single stop give 0.
pub fn max_stops(tour_length_minutes: u32, viewing_minutes_per_stop: u32, viewing_share_pct: u32) -> usize {
    let viewing_minutes = u64::from(tour_length_minutes) * u64::from(viewing_share_pct) / 100;
    viewing_minutes
        .checked_div(u64::from(viewing_minutes_per_stop))
        .unwrap_or(0) as usize
}
