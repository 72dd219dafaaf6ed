//! Statistics calculation engine.
//!
//! Computes derived metrics from the transformed tables:
//! - Win percentages
//! - Career aggregates and side distribution
//! - Top-N hero and teammate rankings (see [`ranking`])

pub mod ranking;

pub use ranking::*;

use crate::models::{Aggregates, MatchRow, Side, SideDistribution};

/// Win percentage rounded to one decimal, 0 when no games were played.
pub fn win_percentage(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        let pct = (wins as f64 / games as f64 * 1000.0).round() / 10.0;
        pct.min(100.0)
    }
}

/// Fold the match table into career totals.
pub fn aggregate_matches(matches: &[MatchRow]) -> Aggregates {
    let mut totals = Aggregates::default();

    for row in matches {
        totals.match_count += 1;
        if row.is_win() {
            totals.wins += 1;
        } else {
            totals.losses += 1;
        }
        totals.total_kills += u64::from(row.kills);
        totals.total_deaths += u64::from(row.deaths);
        totals.total_assists += u64::from(row.assists);
    }

    totals
}

/// Count matches per side.
pub fn side_distribution(matches: &[MatchRow]) -> SideDistribution {
    let mut sides = SideDistribution::default();

    for row in matches {
        match row.side {
            Side::Radiant => sides.radiant += 1,
            Side::Dire => sides.dire += 1,
        }
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchResult, SkillLevel};

    fn row(side: Side, winner: Side, kills: u32, deaths: u32, assists: u32) -> MatchRow {
        MatchRow {
            match_id: 1,
            side,
            winner,
            hero_id: 1,
            hero_name: None,
            match_date: "2024-01-01 00:00".to_string(),
            duration: "00:30:00".to_string(),
            game_mode: "all pick".to_string(),
            kills,
            deaths,
            assists,
            skill_level: SkillLevel::NotAvailable,
            result: MatchResult::from_sides(side, winner),
        }
    }

    #[test]
    fn test_win_percentage() {
        assert_eq!(win_percentage(1, 2), 50.0);
        assert_eq!(win_percentage(2, 3), 66.7);
        assert_eq!(win_percentage(1, 3), 33.3);
        assert_eq!(win_percentage(5, 5), 100.0);
        assert_eq!(win_percentage(0, 0), 0.0);
        assert_eq!(win_percentage(3, 0), 0.0);
    }

    #[test]
    fn test_win_percentage_never_exceeds_100() {
        assert_eq!(win_percentage(7, 5), 100.0);
    }

    #[test]
    fn test_aggregate_matches() {
        let matches = vec![
            row(Side::Radiant, Side::Radiant, 10, 2, 5),
            row(Side::Dire, Side::Radiant, 3, 8, 1),
            row(Side::Dire, Side::Dire, 0, 0, 20),
        ];

        let totals = aggregate_matches(&matches);

        assert_eq!(totals.match_count, 3);
        assert_eq!(totals.wins, 2);
        assert_eq!(totals.losses, 1);
        assert_eq!(totals.total_kills, 13);
        assert_eq!(totals.total_deaths, 10);
        assert_eq!(totals.total_assists, 26);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate_matches(&[]), Aggregates::default());
        assert_eq!(side_distribution(&[]), SideDistribution::default());
    }

    #[test]
    fn test_aggregate_is_additive() {
        let matches: Vec<MatchRow> = (0..12u32)
            .map(|i| {
                let side = if i % 3 == 0 { Side::Dire } else { Side::Radiant };
                let winner = if i % 2 == 0 { Side::Dire } else { Side::Radiant };
                row(side, winner, i, i * 2, i + 7)
            })
            .collect();

        let whole = aggregate_matches(&matches);
        for split in 0..=matches.len() {
            let (a, b) = matches.split_at(split);
            let (a, b) = (aggregate_matches(a), aggregate_matches(b));

            assert_eq!(whole.match_count, a.match_count + b.match_count);
            assert_eq!(whole.wins, a.wins + b.wins);
            assert_eq!(whole.losses, a.losses + b.losses);
            assert_eq!(whole.total_kills, a.total_kills + b.total_kills);
            assert_eq!(whole.total_deaths, a.total_deaths + b.total_deaths);
            assert_eq!(whole.total_assists, a.total_assists + b.total_assists);
        }
    }

    #[test]
    fn test_side_distribution() {
        let matches = vec![
            row(Side::Radiant, Side::Radiant, 0, 0, 0),
            row(Side::Dire, Side::Radiant, 0, 0, 0),
            row(Side::Radiant, Side::Dire, 0, 0, 0),
        ];

        let sides = side_distribution(&matches);
        assert_eq!(sides.radiant, 2);
        assert_eq!(sides.dire, 1);
    }
}
