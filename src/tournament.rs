//! Ordinal tournament tiers from free-text tournament names.

const GRAND_SLAMS: [&str; 4] = ["australian open", "roland garros", "wimbledon", "u.s. open"];

const TEAM_AND_FINALS: [&str; 2] = ["atp finals", "laver cup"];

const MASTERS_1000: [&str; 9] = [
    "indian wells",
    "miami",
    "monte carlo",
    "madrid",
    "rome",
    "canada",
    "cincinnati",
    "shanghai",
    "paris",
];

const ATP_500: [&str; 11] = [
    "rotterdam",
    "dubai",
    "acapulco",
    "barcelona",
    "queen",
    "halle",
    "hamburg",
    "beijing",
    "tokyo",
    "vienna",
    "basel",
];

/// Maps a tournament name to its tier: 4 Grand Slam, 3 Masters/Finals,
/// 2 ATP 500, 1 everything else. Matching is case-insensitive substring
/// containment against the fixed lists.
pub fn category(tournament: &str) -> u8 {
    let name = tournament.to_lowercase();
    let matches_any = |list: &[&str]| list.iter().any(|needle| name.contains(needle));

    if matches_any(&GRAND_SLAMS) {
        4
    } else if matches_any(&TEAM_AND_FINALS) || matches_any(&MASTERS_1000) {
        3
    } else if matches_any(&ATP_500) {
        2
    } else {
        1
    }
}
