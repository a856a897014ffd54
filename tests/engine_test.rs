//! End-to-end behaviour of the qada engine through `Session`.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use qada::engine::{EstimatorPolicy, ExternalProgress, Session, XpRewards};
use qada::models::{PrayerType, QadaProfile};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Duration::days(offset)
}

fn onboarded_session() -> Session {
    let mut session = Session::new(EstimatorPolicy::default());
    session.tick(day(0));
    session
        .onboard(QadaProfile {
            current_age: 23.0,
            puberty_age: 13.0,
            regularity_percent: 50,
            safety_margin_enabled: false,
            is_female: false,
        })
        .unwrap();
    session
}

fn pray_all(session: &mut Session) {
    for p in PrayerType::all() {
        session.mark_daily_prayer(p);
    }
}

#[test]
fn estimator_scenario_seeds_ledger() {
    let session = onboarded_session();
    assert_eq!(session.ledger().initial_prayer_debt, 9125);
    assert_eq!(session.ledger().prayer_debt, 9125);
    assert_eq!(session.ledger().fasting_debt, 150);
    assert_eq!(session.ledger().fasting_completed, 0);
}

#[test]
fn idempotent_fast_logging() {
    let mut once = onboarded_session();
    let mut twice = onboarded_session();
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    once.validate_one_fasting(false, date);
    twice.validate_one_fasting(false, date);
    twice.validate_one_fasting(false, date);

    assert_eq!(once.ledger().fasting_debt, twice.ledger().fasting_debt);
    assert_eq!(once.ledger().fasting_completed, twice.ledger().fasting_completed);
    assert_eq!(once.experience().experience, twice.experience().experience);
}

#[test]
fn streak_reset_law() {
    let mut session = onboarded_session();
    for d in 0..4 {
        session.tick(day(d));
        pray_all(&mut session);
    }
    assert_eq!(session.daily().prayer_streak, 4);

    // Full day closed: preserved, not incremented.
    session.tick(day(4));
    assert_eq!(session.daily().prayer_streak, 4);

    // Only four prayers on day 4: reset at the next boundary.
    for p in &PrayerType::all()[..4] {
        session.mark_daily_prayer(*p);
    }
    assert_eq!(session.daily().prayer_streak, 4);
    session.tick(day(5));
    assert_eq!(session.daily().prayer_streak, 0);
    assert_eq!(session.daily().best_streak, 4);
}

#[test]
fn badges_are_never_revoked() {
    let mut session = onboarded_session();
    let progress = ExternalProgress::default();
    for d in 0..7 {
        session.tick(day(d));
        pray_all(&mut session);
        session.evaluate_badges(&progress);
    }
    assert!(session.badges().is_unlocked("streak_7"));

    session.tick(day(10));
    session.adjust_prayer_debt(100);
    session.evaluate_badges(&progress);
    assert_eq!(session.daily().prayer_streak, 0);
    for id in ["streak_3", "streak_7", "first_prayer"] {
        assert!(session.badges().is_unlocked(id), "{} was revoked", id);
    }
}

#[test]
fn only_last_unlock_is_surfaced() {
    let mut session = onboarded_session();
    let mut progress = ExternalProgress::default();
    progress.surahs_read = 114;
    progress.completed_stories.insert("adam".to_string());

    let newly = session.evaluate_badges(&progress);
    let ids: Vec<_> = newly.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["first_surah", "surahs_30", "all_surahs", "story_adam"]);
    assert_eq!(session.badges().last_unlocked_badge_id.as_deref(), Some("story_adam"));

    session.acknowledge_badge();
    assert!(session.evaluate_badges(&progress).is_empty());
    assert_eq!(session.badges().last_unlocked_badge_id, None);
}

#[test]
fn level_derivation() {
    let mut session = Session::new(EstimatorPolicy::default());
    session.tick(day(0));
    assert_eq!(session.experience().level, 1);

    // 9 on-time prayers over two days = 90 XP (no full-day bonus).
    for p in &PrayerType::all()[..4] {
        session.mark_daily_prayer(*p);
    }
    session.tick(day(1));
    for p in &PrayerType::all()[..4] {
        session.mark_daily_prayer(*p);
    }
    session.tick(day(2));
    session.mark_daily_prayer(PrayerType::Fajr);
    assert_eq!(session.experience().experience, 9 * XpRewards::PRAYER_ON_TIME);
    assert_eq!(session.experience().level, 4);
}

#[test]
fn double_shot_combined_effect() {
    let mut session = Session::new(EstimatorPolicy::default());
    session.tick(day(0));
    session.adjust_prayer_debt(5);
    session.validate_double_shot(PrayerType::Fajr);

    assert_eq!(session.ledger().prayer_debt, 4);
    assert!(session.daily().completions.fajr);
    assert_eq!(
        session.experience().experience,
        XpRewards::PRAYER_ON_TIME + XpRewards::PRAYER_QADA
    );
}

#[test]
fn projection_scenario() {
    let mut session = Session::new(EstimatorPolicy::default());
    session.adjust_prayer_debt(100);
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

    assert_eq!(session.project_completion(5.0, now), Some(now + Duration::days(20)));
    assert_eq!(session.project_completion(0.0, now), None);
    assert_eq!(session.project_completion(-2.0, now), None);

    session.adjust_prayer_debt(-100);
    assert_eq!(session.project_completion(5.0, now), None);
}

#[derive(Debug, Clone)]
enum Op {
    Qada,
    Double(usize),
    Mark(usize),
    Fast(bool, i64),
    AdjustPrayer(i64),
    AdjustFastingDebt(i64),
    AdjustFastingCompleted(i64),
    NextDay,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Qada),
        (0usize..5).prop_map(Op::Double),
        (0usize..5).prop_map(Op::Mark),
        (any::<bool>(), 0i64..20).prop_map(|(v, d)| Op::Fast(v, d)),
        (-50i64..50).prop_map(Op::AdjustPrayer),
        (-50i64..50).prop_map(Op::AdjustFastingDebt),
        (-50i64..50).prop_map(Op::AdjustFastingCompleted),
        Just(Op::NextDay),
    ]
}

proptest! {
    #[test]
    fn debt_never_negative_and_xp_monotonic(
        start_prayers in 0i64..10,
        start_fasts in 0i64..10,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut session = Session::new(EstimatorPolicy::default());
        let mut today = 0;
        session.tick(day(today));
        session.adjust_prayer_debt(start_prayers);
        session.adjust_fasting_debt(start_fasts);

        let mut last_xp = 0;
        let mut last_score = 0;
        for op in ops {
            match op {
                Op::Qada => session.validate_one_qada(),
                Op::Double(i) => session.validate_double_shot(PrayerType::all()[i]),
                Op::Mark(i) => {
                    session.mark_daily_prayer(PrayerType::all()[i]);
                }
                Op::Fast(voluntary, d) => {
                    session.validate_one_fasting(voluntary, day(d));
                }
                Op::AdjustPrayer(d) => session.adjust_prayer_debt(d),
                Op::AdjustFastingDebt(d) => session.adjust_fasting_debt(d),
                Op::AdjustFastingCompleted(d) => session.adjust_fasting_completed(d),
                Op::NextDay => {
                    today += 1;
                    session.tick(day(today));
                }
            }

            let snapshot = session.snapshot();
            // Unsigned counters cannot go negative; check they never wrapped.
            prop_assert!(snapshot.ledger.prayer_debt < 1_000_000);
            prop_assert!(snapshot.ledger.fasting_debt < 1_000_000);
            prop_assert!(snapshot.ledger.fasting_completed < 1_000_000);
            prop_assert!(snapshot.experience.experience >= last_xp);
            prop_assert!(snapshot.ledger.lifetime_prayer_score >= last_score);
            prop_assert_eq!(
                snapshot.experience.level,
                ((snapshot.experience.experience / 10) as f64).sqrt().floor() as u32 + 1
            );
            last_xp = snapshot.experience.experience;
            last_score = snapshot.ledger.lifetime_prayer_score;
        }
    }
}
