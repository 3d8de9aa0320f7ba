//! Typed data model for the three scraped JSON collections.
//!
//! Field names follow the scraper's French keys on the wire and are mapped
//! to English struct fields at the decoding boundary. Numeric-looking
//! attributes (rank, age, points) arrive as display strings and are parsed
//! later, in `features`.

use serde::Deserialize;

/// One entry of the ranking roster (`joueurs.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub rank: String,
    #[serde(rename = "nom_joueur")]
    pub name: String,
    #[serde(rename = "pays", default)]
    pub country: String,
    #[serde(rename = "pays_abreviation", default)]
    pub country_code: String,
    #[serde(rename = "lien_joueur", default)]
    pub profile_link: String,
    pub age: String,
    pub points: String,
}

/// Per-player detail record (`detail_joueurs.json` values).
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDetail {
    #[serde(rename = "profil")]
    pub profile: PlayerProfile,
    #[serde(rename = "matchs")]
    pub matches: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerProfile {
    #[serde(rename = "nom")]
    pub name: String,
}

/// One completed match, seen from the owning player's perspective.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchEvent {
    pub date: String,
    #[serde(default)]
    pub stage: String,
    #[serde(rename = "nom_opposant")]
    pub opponent: String,
    pub score: String,
    #[serde(rename = "resultat")]
    pub outcome: Outcome,
    #[serde(rename = "lien_detail_match")]
    pub link: String,
    #[serde(rename = "tournoi")]
    pub tournament: String,
    #[serde(rename = "type_terrain")]
    pub surface: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Outcome {
    #[serde(rename = "victoire")]
    Win,
    #[serde(rename = "défaite")]
    Loss,
}

impl MatchEvent {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// Serve/return statistics for one match (`stats_matchs.json` values).
///
/// Both sides are keyed by player name; the detail link joins back to the
/// players' match lists, which is where the match date lives.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchStats {
    #[serde(rename = "lien_match")]
    pub link: String,
    #[serde(rename = "joueur_gagnant")]
    pub winner: SideStats,
    #[serde(rename = "joueur_perdant")]
    pub loser: SideStats,
}

/// One side's raw statistics. Ratio statistics use the `N/D (P%)`
/// encoding, absolute ones a bare integer; `NA` or an empty string stands
/// for a value the source page did not report.
#[derive(Debug, Clone, Deserialize)]
pub struct SideStats {
    #[serde(rename = "nom_joueur")]
    pub player: String,
    #[serde(rename = "premier_service", default)]
    pub first_serve: String,
    #[serde(rename = "pnts_gagnes_ps", default)]
    pub first_serve_won: String,
    #[serde(rename = "pnts_gagnes_ss", default)]
    pub second_serve_won: String,
    #[serde(rename = "retours_gagnes", default)]
    pub return_points_won: String,
    #[serde(rename = "balles_break_gagnees", default)]
    pub break_points_won: String,
    #[serde(rename = "double_fautes", default)]
    pub double_faults: String,
    #[serde(default)]
    pub aces: String,
}

/// Ratio-encoded statistics carried by [`SideStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioStat {
    FirstServe,
    FirstServeWon,
    SecondServeWon,
    ReturnPointsWon,
    BreakPointsWon,
}

/// Absolute-count statistics carried by [`SideStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStat {
    DoubleFaults,
    Aces,
}

impl SideStats {
    pub fn ratio_raw(&self, stat: RatioStat) -> &str {
        match stat {
            RatioStat::FirstServe => &self.first_serve,
            RatioStat::FirstServeWon => &self.first_serve_won,
            RatioStat::SecondServeWon => &self.second_serve_won,
            RatioStat::ReturnPointsWon => &self.return_points_won,
            RatioStat::BreakPointsWon => &self.break_points_won,
        }
    }

    pub fn count_raw(&self, stat: CountStat) -> &str {
        match stat {
            CountStat::DoubleFaults => &self.double_faults,
            CountStat::Aces => &self.aces,
        }
    }
}
