//! The dashboard pipeline.
//!
//! One run fetches the four record sets for a player concurrently, then
//! transforms, aggregates and ranks them into a [`PipelineResult`]. Any
//! retrieval failure aborts the run; nothing partial is returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::calculate::{
    aggregate_matches, hero_match_history, side_distribution, top_by_games, top_by_win_rate,
    top_friends, top_winning_friends,
};
use crate::config::PipelineConfig;
use crate::fetch::{FetchError, StatsSource};
use crate::models::{PipelineResult, RawHeroStat, RawMatch, RawPeer, RawProfile};
use crate::reference::ReferenceData;
use crate::transform::{build_hero_table, build_match_table, DecodeError};

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to retrieve {resource}: {source}")]
    Retrieval {
        resource: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Failed to decode player data: {0}")]
    Decode(#[from] DecodeError),

    #[error("Player data not retrieved within {}s", .0.as_secs_f64())]
    DeadlineExceeded(Duration),
}

impl PipelineError {
    fn retrieval(resource: &'static str) -> impl FnOnce(FetchError) -> Self {
        move |source| PipelineError::Retrieval { resource, source }
    }
}

/// The four raw record sets for one player.
#[derive(Debug, Clone, Default)]
pub struct RawPlayerData {
    pub profile: RawProfile,
    pub matches: Vec<RawMatch>,
    pub heroes: Vec<RawHeroStat>,
    pub peers: Vec<RawPeer>,
}

/// Runs the dashboard pipeline against a stats source.
pub struct Pipeline {
    source: Arc<dyn StatsSource>,
    reference: Arc<ReferenceData>,
    config: PipelineConfig,
    deadline: Duration,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn StatsSource>,
        reference: Arc<ReferenceData>,
        config: PipelineConfig,
        deadline: Duration,
    ) -> Self {
        Self {
            source,
            reference,
            config,
            deadline,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Run the pipeline for one player. A blank id is a no-op.
    pub async fn run(&self, player_id: &str) -> Result<Option<PipelineResult>, PipelineError> {
        let player_id = player_id.trim();
        if player_id.is_empty() {
            debug!("Empty player id, skipping pipeline run");
            return Ok(None);
        }

        let started = Instant::now();
        info!(
            "Running pipeline for player {} via {}",
            player_id,
            self.source.name()
        );

        let result = self
            .fetch_all(player_id)
            .await
            .and_then(|raw| {
                self.transform(player_id, raw)
                    .map_err(PipelineError::from)
            });

        match &result {
            Ok(dashboard) => info!(
                "Pipeline for player {} finished in {:?}: {} matches, {} heroes",
                player_id,
                started.elapsed(),
                dashboard.aggregates.match_count,
                dashboard.heroes.len()
            ),
            Err(e) => error!("Pipeline for player {} failed: {}", player_id, e),
        }

        result.map(Some)
    }

    /// Fetch all four record sets concurrently under the run deadline.
    pub async fn fetch_all(&self, player_id: &str) -> Result<RawPlayerData, PipelineError> {
        let source = self.source.as_ref();

        let fetches = async {
            tokio::try_join!(
                async {
                    source
                        .fetch_profile(player_id)
                        .await
                        .map_err(PipelineError::retrieval("profile"))
                },
                async {
                    source
                        .fetch_matches(player_id)
                        .await
                        .map_err(PipelineError::retrieval("matches"))
                },
                async {
                    source
                        .fetch_hero_stats(player_id)
                        .await
                        .map_err(PipelineError::retrieval("hero stats"))
                },
                async {
                    source
                        .fetch_peers(player_id)
                        .await
                        .map_err(PipelineError::retrieval("peers"))
                },
            )
        };

        let (profile, matches, heroes, peers) = tokio::time::timeout(self.deadline, fetches)
            .await
            .map_err(|_| PipelineError::DeadlineExceeded(self.deadline))??;

        debug!(
            "Fetched {} matches, {} hero stats, {} peers for player {}",
            matches.len(),
            heroes.len(),
            peers.len(),
            player_id
        );

        Ok(RawPlayerData {
            profile,
            matches,
            heroes,
            peers,
        })
    }

    /// Turn fetched records into the dashboard bundle.
    pub fn transform(
        &self,
        player_id: &str,
        raw: RawPlayerData,
    ) -> Result<PipelineResult, DecodeError> {
        let matches = build_match_table(&raw.matches, &self.reference);
        let heroes = build_hero_table(
            &raw.heroes,
            &self.reference.heroes,
            self.config.unknown_hero_policy,
        )?;

        let by_games = top_by_games(&heroes, self.config.top_heroes);
        let top_hero_matches = hero_match_history(&matches, &by_games);
        let top_heroes_by_games = by_games.into_iter().cloned().collect();
        let top_heroes_by_win_rate = top_by_win_rate(&heroes, self.config.top_heroes)
            .into_iter()
            .cloned()
            .collect();

        Ok(PipelineResult {
            player_id: player_id.to_string(),
            player: raw.profile.into(),
            aggregates: aggregate_matches(&matches),
            sides: side_distribution(&matches),
            top_friends: top_friends(&raw.peers, self.config.top_peers),
            top_winning_friends: top_winning_friends(&raw.peers, self.config.top_peers),
            top_heroes_by_games,
            top_heroes_by_win_rate,
            top_hero_matches,
            matches,
            heroes,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{MatchResult, RawHeroEntry, Side, SkillLevel};
    use crate::reference::{GameModeCatalog, HeroCatalog};
    use crate::transform::UnknownHeroPolicy;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// In-memory source with optional failure and latency.
    #[derive(Default, Clone)]
    pub(crate) struct StaticSource {
        pub data: RawPlayerData,
        pub catalog: Vec<RawHeroEntry>,
        pub fail_peers: bool,
        pub delay: Option<Duration>,
    }

    impl StaticSource {
        async fn pause(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl StatsSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_profile(&self, _player_id: &str) -> Result<RawProfile, FetchError> {
            self.pause().await;
            Ok(self.data.profile.clone())
        }

        async fn fetch_matches(&self, _player_id: &str) -> Result<Vec<RawMatch>, FetchError> {
            self.pause().await;
            Ok(self.data.matches.clone())
        }

        async fn fetch_hero_stats(&self, _player_id: &str) -> Result<Vec<RawHeroStat>, FetchError> {
            self.pause().await;
            Ok(self.data.heroes.clone())
        }

        async fn fetch_peers(&self, _player_id: &str) -> Result<Vec<RawPeer>, FetchError> {
            self.pause().await;
            if self.fail_peers {
                return Err(FetchError::HttpStatus {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok(self.data.peers.clone())
        }

        async fn fetch_hero_catalog(&self) -> Result<Vec<RawHeroEntry>, FetchError> {
            Ok(self.catalog.clone())
        }
    }

    pub(crate) fn sample_catalog() -> Vec<RawHeroEntry> {
        [(1, "Anti-Mage"), (2, "Axe"), (8, "Juggernaut"), (14, "Pudge")]
            .into_iter()
            .map(|(id, name)| RawHeroEntry {
                id,
                localized_name: name.to_string(),
            })
            .collect()
    }

    pub(crate) fn sample_data() -> RawPlayerData {
        RawPlayerData {
            profile: RawProfile::default(),
            matches: vec![
                RawMatch {
                    match_id: 1,
                    player_slot: 5,
                    radiant_win: Some(true),
                    hero_id: 8,
                    start_time: Some(1_700_000_000),
                    duration: Some(1800),
                    game_mode: Some(22),
                    skill: Some(2.0),
                    kills: 10,
                    deaths: 2,
                    assists: 5,
                },
                RawMatch {
                    match_id: 2,
                    player_slot: 200,
                    radiant_win: Some(false),
                    hero_id: 14,
                    start_time: Some(1_700_100_000),
                    duration: None,
                    game_mode: Some(23),
                    skill: None,
                    kills: 3,
                    deaths: 8,
                    assists: 1,
                },
            ],
            heroes: vec![
                RawHeroStat {
                    hero_id: 8,
                    last_played: None,
                    games: 40,
                    win: 22,
                    with_games: 0,
                    with_win: 0,
                    against_games: 12,
                    against_win: 5,
                },
                RawHeroStat {
                    hero_id: 14,
                    last_played: None,
                    games: 10,
                    win: 8,
                    with_games: 2,
                    with_win: 1,
                    against_games: 0,
                    against_win: 0,
                },
                RawHeroStat {
                    hero_id: 2,
                    last_played: None,
                    games: 0,
                    win: 0,
                    with_games: 0,
                    with_win: 0,
                    against_games: 0,
                    against_win: 0,
                },
            ],
            peers: vec![
                RawPeer {
                    account_id: 11,
                    personaname: Some("Notail".to_string()),
                    with_games: 50,
                    with_win: 20,
                },
                RawPeer {
                    account_id: 12,
                    personaname: None,
                    with_games: 70,
                    with_win: 25,
                },
            ],
        }
    }

    fn pipeline(source: StaticSource, deadline: Duration) -> Pipeline {
        let reference = ReferenceData::new(
            HeroCatalog::from_entries(source.catalog.clone()),
            GameModeCatalog::bundled().unwrap(),
        );
        Pipeline::new(
            Arc::new(source),
            Arc::new(reference),
            PipelineConfig::default(),
            deadline,
        )
    }

    fn sample_source() -> StaticSource {
        StaticSource {
            data: sample_data(),
            catalog: sample_catalog(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_two_matches() {
        let p = pipeline(sample_source(), Duration::from_secs(5));
        let result = p.run("86745912").await.unwrap().unwrap();

        let first = &result.matches[0];
        assert_eq!(first.side, Side::Radiant);
        assert_eq!(first.winner, Side::Radiant);
        assert_eq!(first.result, MatchResult::Win);
        assert_eq!(first.duration, "00:30:00");
        assert_eq!(first.skill_level, SkillLevel::High);

        let second = &result.matches[1];
        assert_eq!(second.side, Side::Dire);
        assert_eq!(second.winner, Side::Dire);
        assert_eq!(second.result, MatchResult::Win);
        assert_eq!(second.duration, "00:00:00");
        assert_eq!(second.skill_level, SkillLevel::NotAvailable);
        assert_eq!(second.game_mode, "turbo");

        let a = result.aggregates;
        assert_eq!(a.match_count, 2);
        assert_eq!(a.wins, 2);
        assert_eq!(a.losses, 0);
        assert_eq!(a.total_kills, 13);
        assert_eq!(a.total_deaths, 10);
        assert_eq!(a.total_assists, 6);

        assert_eq!(result.sides.radiant, 1);
        assert_eq!(result.sides.dire, 1);
    }

    #[tokio::test]
    async fn test_hero_tables_and_rankings() {
        let p = pipeline(sample_source(), Duration::from_secs(5));
        let result = p.run("1").await.unwrap().unwrap();

        let heroes: Vec<&str> = result.heroes.iter().map(|h| h.hero.as_str()).collect();
        assert_eq!(heroes, vec!["Juggernaut", "Pudge", "Axe"]);
        assert_eq!(result.heroes[0].win_pct, 55.0);
        assert_eq!(result.heroes[0].win_against_pct, 41.7);

        let by_rate: Vec<&str> = result
            .top_heroes_by_win_rate
            .iter()
            .map(|h| h.hero.as_str())
            .collect();
        assert_eq!(by_rate, vec!["Pudge", "Juggernaut", "Axe"]);

        assert_eq!(result.top_hero_matches[0].hero, "Juggernaut");
        assert_eq!(result.top_hero_matches[0].matches.len(), 1);
        assert_eq!(result.top_hero_matches[1].matches[0].kills, 3);

        assert_eq!(result.top_friends[0].name, "12");
        assert_eq!(result.top_friends[0].games, 70);
        assert_eq!(result.top_winning_friends[1].name, "Notail");
    }

    #[tokio::test]
    async fn test_empty_player_id_is_noop() {
        let p = pipeline(sample_source(), Duration::from_secs(5));
        assert!(p.run("").await.unwrap().is_none());
        assert!(p.run("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_record_sets() {
        let source = StaticSource {
            catalog: sample_catalog(),
            ..Default::default()
        };
        let p = pipeline(source, Duration::from_secs(5));

        let result = p.run("1").await.unwrap().unwrap();
        assert!(result.matches.is_empty());
        assert!(result.heroes.is_empty());
        assert!(result.top_friends.is_empty());
        assert!(result.top_hero_matches.is_empty());
        assert_eq!(result.aggregates, crate::models::Aggregates::default());
    }

    #[tokio::test]
    async fn test_retrieval_failure_aborts_run() {
        let source = StaticSource {
            fail_peers: true,
            ..sample_source()
        };
        let p = pipeline(source, Duration::from_secs(5));

        let err = p.run("1").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Retrieval {
                resource: "peers",
                ..
            }
        ));

        // The pipeline is reusable after a failed run
        assert!(p.run("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let source = StaticSource {
            delay: Some(Duration::from_millis(500)),
            ..sample_source()
        };
        let p = pipeline(source, Duration::from_millis(20));

        let err = p.run("1").await.unwrap_err();
        assert!(matches!(err, PipelineError::DeadlineExceeded(_)));
    }

    #[tokio::test]
    async fn test_null_cells_in_payloads_default_to_zero() {
        use crate::fetch::FixtureSource;
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        let files = [
            ("heroStats.json", r#"[{"id": 8, "localized_name": "Juggernaut"}]"#),
            ("profile.json", r#"{"profile": null, "rank_tier": null}"#),
            (
                "matches.json",
                r#"[{"match_id": 5, "player_slot": 1, "radiant_win": true, "hero_id": 8,
                     "kills": null, "deaths": 4, "assists": null, "duration": null}]"#,
            ),
            (
                "heroes.json",
                r#"[{"hero_id": "8", "games": 6, "win": 3, "with_games": null,
                     "with_win": null, "against_games": null, "against_win": null}]"#,
            ),
            ("peers.json", r#"[{"account_id": 3, "with_games": null, "with_win": 1}]"#),
        ];
        for (name, content) in files {
            std::fs::write(tmp.path().join(name), content).unwrap();
        }

        let source = FixtureSource::new(tmp.path());
        let reference = ReferenceData::load(&source).await.unwrap();
        let p = Pipeline::new(
            Arc::new(source),
            Arc::new(reference),
            PipelineConfig::default(),
            Duration::from_secs(5),
        );

        let result = p.run("77").await.unwrap().unwrap();

        assert_eq!(result.matches[0].kills, 0);
        assert_eq!(result.matches[0].deaths, 4);
        assert_eq!(result.matches[0].duration, "00:00:00");
        assert_eq!(result.aggregates.total_assists, 0);
        assert_eq!(result.heroes[0].hero, "Juggernaut");
        assert_eq!(result.heroes[0].win_pct, 50.0);
        assert_eq!(result.heroes[0].games_against, 0);
        assert_eq!(result.heroes[0].win_against_pct, 0.0);
        assert_eq!(result.top_friends[0].games, 0);
        assert_eq!(result.top_winning_friends[0].wins, 1);
    }

    #[tokio::test]
    async fn test_unknown_hero_fail_policy() {
        let mut data = sample_data();
        data.heroes[0].hero_id = 4242;
        let source = StaticSource {
            data,
            catalog: sample_catalog(),
            ..Default::default()
        };
        let reference = ReferenceData::new(
            HeroCatalog::from_entries(sample_catalog()),
            GameModeCatalog::bundled().unwrap(),
        );
        let p = Pipeline::new(
            Arc::new(source),
            Arc::new(reference),
            PipelineConfig {
                unknown_hero_policy: UnknownHeroPolicy::Fail,
                ..Default::default()
            },
            Duration::from_secs(5),
        );

        let err = p.run("1").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Decode(DecodeError::UnknownHero { hero_id: 4242 })
        ));
    }
}
