//! Property tests: random rule sets × random point streams.

use proptest::prelude::*;

use super::apply_point;
use crate::analysis::{get_important_point, point_stakes, ImportantPointType};
use crate::models::{
    new_match, Match, MatchFormat, MatchSetup, Player, PointValue, ScoringSystem, SetRecord,
    Settings, TeamId, TiebreakType,
};

fn scoring_strategy() -> impl Strategy<Value = ScoringSystem> {
    prop_oneof![Just(ScoringSystem::Classic), Just(ScoringSystem::NoAd), Just(ScoringSystem::Fast4)]
}

prop_compose! {
    fn settings_strategy()(
        sets in prop_oneof![Just(1u8), Just(2u8), Just(3u8), Just(5u8)],
        super_set in prop::bool::weighted(0.15),
        scoring_system in scoring_strategy(),
        tiebreak_enabled in any::<bool>(),
        championship in any::<bool>(),
        tiebreak_at in 4u32..=6,
        final_set_tiebreak in any::<bool>(),
        long_final in any::<bool>(),
        golden_game in any::<bool>(),
        golden_point in any::<bool>(),
        windbreak in any::<bool>(),
    ) -> Settings {
        Settings {
            sets: if super_set { 1 } else { sets },
            is_super_set: super_set,
            scoring_system,
            tiebreak_enabled,
            tiebreak_type: if championship { TiebreakType::Championship } else { TiebreakType::Regular },
            tiebreak_at,
            final_set_tiebreak,
            final_set_tiebreak_length: if long_final { 10 } else { 7 },
            golden_game,
            golden_point,
            windbreak,
        }
    }
}

fn match_with(settings: Settings, doubles: bool) -> Match {
    let setup = if doubles {
        MatchSetup::doubles(["A1", "A2"], ["B1", "B2"])
    } else {
        MatchSetup::new(MatchFormat::Singles, vec![Player::new("A")], vec![Player::new("B")])
    };
    new_match(setup.with_settings(settings)).unwrap()
}

fn team(a: bool) -> TeamId {
    if a {
        TeamId::TeamA
    } else {
        TeamId::TeamB
    }
}

/// Points the tiebreak of a set had to reach, given the sets archived before it.
/// A deciding set under `final_set_tiebreak` plays to the final-set length,
/// whether it was pre-seeded or reached at the tiebreak game count.
fn tiebreak_target(settings: &Settings, earlier: &[SetRecord], sets_to_win: u32) -> u32 {
    let needed = sets_to_win.saturating_sub(1);
    let won = |t: TeamId| earlier.iter().filter(|s| s.winner == t).count() as u32;
    let deciding = won(TeamId::TeamA) == needed && won(TeamId::TeamB) == needed;
    if settings.final_set_tiebreak && deciding && !settings.is_super_set {
        settings.final_set_tiebreak_length
    } else {
        settings.tiebreak_type.points()
    }
}

fn check_snapshot(m: &Match) -> Result<(), TestCaseError> {
    let settings = &m.settings;

    // set tallies agree with the archive
    for t in TeamId::BOTH {
        let archived = m.score.sets.iter().filter(|s| s.winner == t).count() as u32;
        prop_assert_eq!(m.score.sets_for(t), archived);
    }

    for (i, record) in m.score.sets.iter().enumerate() {
        let (won, lost) = (record.games(record.winner), record.games(record.winner.opponent()));
        prop_assert!(won > lost, "set winner must lead: {:?}", record);

        match record.tiebreak {
            Some(tb) => {
                let (tw, tl) = match record.winner {
                    TeamId::TeamA => (tb.team_a, tb.team_b),
                    TeamId::TeamB => (tb.team_b, tb.team_a),
                };
                let target = tiebreak_target(settings, &m.score.sets[..i], m.sets_to_win());
                prop_assert!(tw >= target, "set {} tiebreak {:?} below {}", i + 1, tb, target);
                prop_assert!(tw >= tl + 2, "tiebreak margin: {:?}", tb);
                // closed on the first point that satisfied both rules
                prop_assert!(tw == target || tw == tl + 2, "tiebreak overplayed: {:?}", tb);
            }
            None if won - lost < 2 => {
                let golden = settings.golden_game && won == 6 && lost == 5;
                let fast4 = settings.scoring_system == ScoringSystem::Fast4;
                prop_assert!(golden || fast4, "short margin without a shortcut: {:?}", record);
            }
            None => {}
        }
    }

    if m.is_completed {
        let winner = m.winner.ok_or_else(|| TestCaseError::fail("completed without a winner"))?;
        prop_assert_eq!(m.score.sets_for(winner), m.sets_to_win());
    } else {
        prop_assert!(m.winner.is_none());
    }

    if m.format == MatchFormat::Singles {
        prop_assert_eq!(m.current_server.player_index, 0);
    }

    if let Some(set) = m.current_set() {
        if !set.is_tiebreak {
            for value in [set.current_game.team_a, set.current_game.team_b] {
                match value {
                    PointValue::Advantage => {
                        prop_assert!(settings.scoring_system.has_advantage(), "Ad under {:?}", settings.scoring_system)
                    }
                    PointValue::Count(n) => prop_assert!(matches!(n, 0 | 15 | 30 | 40), "value {}", n),
                }
            }
        }
    }

    for t in TeamId::BOTH {
        let stakes = point_stakes(m, t);
        if stakes.match_point {
            prop_assert!(stakes.set_point);
        }
        if stakes.set_point {
            prop_assert!(stakes.game_point || stakes.tiebreak_point);
        }
    }

    let point = get_important_point(Some(m));
    prop_assert_eq!(point.kind.is_some(), point.team.is_some());
    if let (Some(kind), Some(t)) = (point.kind, point.team) {
        let stakes = point_stakes(m, t);
        let holds = match kind {
            ImportantPointType::MatchPoint => stakes.match_point,
            ImportantPointType::SetPoint => stakes.set_point,
            ImportantPointType::GamePoint => stakes.game_point,
            ImportantPointType::TiebreakPoint => stakes.tiebreak_point,
        };
        prop_assert!(holds, "{:?} reported for {} without the stake", kind, t);
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_invariants_hold_for_any_point_stream(
        settings in settings_strategy(),
        doubles in any::<bool>(),
        points in prop::collection::vec(any::<bool>(), 0..400),
    ) {
        let mut m = match_with(settings, doubles);
        check_snapshot(&m)?;
        for a in points {
            let next = apply_point(&m, team(a));
            if m.is_completed {
                prop_assert_eq!(&next, &m, "completed match must not change");
            }
            m = next;
            check_snapshot(&m)?;
        }
    }

    #[test]
    fn prop_no_advantage_without_classic(
        scoring in prop_oneof![Just(ScoringSystem::NoAd), Just(ScoringSystem::Fast4)],
        points in prop::collection::vec(any::<bool>(), 0..200),
    ) {
        let mut m = match_with(Settings { scoring_system: scoring, ..Settings::default() }, false);
        for a in points {
            m = apply_point(&m, team(a));
            if let Some(set) = m.current_set() {
                prop_assert!(!set.current_game.team_a.is_advantage());
                prop_assert!(!set.current_game.team_b.is_advantage());
            }
        }
    }

    #[test]
    fn prop_one_team_always_wins_eventually(
        settings in settings_strategy(),
        winner_is_a in any::<bool>(),
    ) {
        // Straight points always finish a match within a bounded number of points.
        let mut m = match_with(settings, false);
        for _ in 0..1000 {
            if m.is_completed {
                break;
            }
            m = apply_point(&m, team(winner_is_a));
        }
        prop_assert!(m.is_completed);
        prop_assert_eq!(m.winner, Some(team(winner_is_a)));
    }
}
