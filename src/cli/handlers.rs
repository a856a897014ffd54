use anyhow::{anyhow, bail, Context, Result};
use chrono::Duration;
use rusqlite::Connection;
use std::str::FromStr;

use crate::cli::args::{FastCommands, ProgressCommands, QadaCommands};
use crate::config::AppConfig;
use crate::db::repository::{MetaRepo, ProgressKind, ProgressRepo};
use crate::engine::clock::date_string;
use crate::engine::experience::xp_for_level;
use crate::engine::projector::days_remaining;
use crate::engine::{BadgeDef, Clock, Session, BADGES};
use crate::models::{PrayerType, QadaProfile};
use crate::utils::format::{format_count, format_days, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn parse_prayer(s: &str) -> Result<PrayerType> {
    PrayerType::from_str(s)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, zuhr, asr, maghrib, isha", s))
}

fn ensure_setup(session: &Session) -> Result<()> {
    if !session.is_onboarded() {
        bail!("No estimate yet. Run `qada setup --current-age <AGE> --puberty-age <AGE>` first");
    }
    Ok(())
}

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(
    conn: &Connection,
    session: &mut Session,
    clock: &dyn Clock,
    profile: QadaProfile,
    reset: bool,
) -> Result<()> {
    if session.is_onboarded() && !reset {
        println!("An estimate already exists. Use --reset to replace it.");
        return Ok(());
    }

    let estimate = session
        .onboard(profile)
        .map_err(|e| anyhow!("Could not estimate debt: {}", e))?;
    MetaRepo::set(conn, "onboarded_at", &date_string(clock.today()))?;

    println!();
    println_colored!(GOLD, "  Qada estimate");
    println!();
    println_colored!(
        BOLD,
        "  Prayers:  {}",
        format_count(estimate.initial_prayer_debt)
    );
    println_colored!(
        BOLD,
        "  Fasts:    {}",
        format_count(estimate.initial_fasting_debt)
    );
    println!();
    Ok(())
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(
    conn: &Connection,
    session: &Session,
    config: &AppConfig,
    clock: &dyn Clock,
) -> Result<()> {
    let ledger = session.ledger();
    let daily = session.daily();
    let xp = session.experience();

    println!();
    println_colored!(GOLD, "  Qada — {}", date_string(clock.today()));
    println!();

    if !session.is_onboarded() {
        println_colored!(DIM, "  No estimate yet. Run `qada setup` to get started.");
        println!();
    } else {
        let paid = ledger.initial_prayer_debt.saturating_sub(ledger.prayer_debt);
        println_colored!(
            BOLD,
            "  Prayers owed:  {}  {}  {:.1}%",
            format_count(ledger.prayer_debt),
            progress_bar(paid, ledger.initial_prayer_debt, 16),
            ledger.prayer_progress()
        );
        println_colored!(
            BOLD,
            "  Fasts owed:    {}  ({} made up, {} logged)",
            format_count(ledger.fasting_debt),
            format_count(ledger.fasting_completed),
            ledger.fasting_streak
        );
        if let Some(days) = days_remaining(ledger.prayer_debt, config.catch_up.daily_rate) {
            println_colored!(
                DIM,
                "  At {}/day: ~{} to clear",
                config.catch_up.daily_rate,
                format_days(days)
            );
        }
        if let Some(since) = MetaRepo::get(conn, "onboarded_at")? {
            println_colored!(DIM, "  Tracking since {}", since);
        }
        println!();
    }

    println_colored!(GOLD, "  Today");
    for prayer in PrayerType::all() {
        if daily.is_marked(prayer) {
            println_colored!(GREEN, "  ● {}", prayer.display_name());
        } else {
            println_colored!(DIM, "  ○ {}", prayer.display_name());
        }
    }
    println!();
    println_colored!(
        BOLD,
        "  Streak:  {} days  |  {} days best",
        daily.prayer_streak,
        daily.best_streak
    );

    let tomorrow = clock.today() + Duration::days(1);
    if ledger.has_intention_for(tomorrow) {
        println_colored!(AMBER, "  Intention to fast tomorrow ({})", date_string(tomorrow));
    }

    println!();
    let floor = xp_for_level(xp.level);
    let next = xp_for_level(xp.level.saturating_add(1));
    println_colored!(
        BOLD,
        "  Level {}  {}  {} / {} XP",
        xp.level,
        progress_bar(
            xp.experience.saturating_sub(floor),
            next.saturating_sub(floor),
            12
        ),
        format_count(xp.experience),
        format_count(next)
    );
    println_colored!(
        DIM,
        "  Badges:  {}/{}",
        session.badges().unlocked_badge_ids.len(),
        BADGES.len()
    );
    println!();
    Ok(())
}

// ─── Mark prayer ─────────────────────────────────────────────────────────────

pub fn handle_mark(session: &mut Session, prayer_str: &str) -> Result<()> {
    let prayer = parse_prayer(prayer_str)?;
    if session.mark_daily_prayer(prayer) {
        println_colored!(GREEN, "  ✓ {} marked as done", prayer.display_name());
        if session.daily().completions.all_done() {
            println_colored!(
                GOLD,
                "  All five prayers done — streak {} days",
                session.daily().prayer_streak
            );
        }
    } else {
        println_colored!(DIM, "  {} was already marked today", prayer.display_name());
    }
    Ok(())
}

// ─── Qada ────────────────────────────────────────────────────────────────────

pub fn handle_qada(session: &mut Session, action: &QadaCommands) -> Result<()> {
    ensure_setup(session)?;
    match action {
        QadaCommands::Complete { count } => {
            for _ in 0..*count {
                session.validate_one_qada();
            }
            println_colored!(
                GREEN,
                "  ✓ {} qada prayer(s) recorded — {} remaining",
                count,
                format_count(session.ledger().prayer_debt)
            );
        }
        QadaCommands::Double { prayer } => {
            let prayer = parse_prayer(prayer)?;
            session.validate_double_shot(prayer);
            println_colored!(
                GREEN,
                "  ✓ {} prayed and counted as qada — {} remaining",
                prayer.display_name(),
                format_count(session.ledger().prayer_debt)
            );
        }
        QadaCommands::Adjust { delta } => {
            session.adjust_prayer_debt(*delta);
            println_colored!(
                AMBER,
                "  Prayer debt adjusted to {}",
                format_count(session.ledger().prayer_debt)
            );
        }
    }
    Ok(())
}

// ─── Fasting ─────────────────────────────────────────────────────────────────

pub fn handle_fast(session: &mut Session, clock: &dyn Clock, action: &FastCommands) -> Result<()> {
    match action {
        FastCommands::Log { voluntary, date } => {
            let date = date.unwrap_or_else(|| clock.today());
            let kind = if *voluntary { "Voluntary" } else { "Qada" };
            if session.validate_one_fasting(*voluntary, date) {
                println_colored!(GREEN, "  ✓ {} fast logged for {}", kind, date_string(date));
            } else {
                println_colored!(DIM, "  {} fast for {} was already logged", kind, date_string(date));
            }
            if !voluntary {
                println_colored!(
                    DIM,
                    "  {} fasts remaining",
                    format_count(session.ledger().fasting_debt)
                );
            }
        }
        FastCommands::AdjustDebt { delta } => {
            session.adjust_fasting_debt(*delta);
            println_colored!(
                AMBER,
                "  Fasting debt adjusted to {}",
                format_count(session.ledger().fasting_debt)
            );
        }
        FastCommands::AdjustCompleted { delta } => {
            session.adjust_fasting_completed(*delta);
            println_colored!(
                AMBER,
                "  Completed fasts adjusted to {}",
                format_count(session.ledger().fasting_completed)
            );
        }
        FastCommands::Intend { date, clear } => {
            if *clear {
                session.set_intention(None);
                println_colored!(DIM, "  Fasting intention cleared");
            } else {
                let date = date.unwrap_or_else(|| clock.today() + Duration::days(1));
                session.set_intention(Some(date));
                println_colored!(GREEN, "  ✓ Intention to fast on {}", date_string(date));
            }
        }
    }
    Ok(())
}

// ─── Projection ──────────────────────────────────────────────────────────────

pub fn handle_project(
    session: &Session,
    config: &AppConfig,
    clock: &dyn Clock,
    rate: Option<f64>,
    fasting_rate: Option<f64>,
) -> Result<()> {
    ensure_setup(session)?;
    let rate = rate.unwrap_or(config.catch_up.daily_rate);
    let fasting_rate = fasting_rate.unwrap_or(config.catch_up.fasting_daily_rate);
    let now = clock.now();

    println!();
    match session.project_completion(rate, now) {
        Some(done) => println_colored!(
            BOLD,
            "  Prayers: clear by {} at {}/day ({})",
            done.format("%Y-%m-%d"),
            rate,
            format_days(days_remaining(session.ledger().prayer_debt, rate).unwrap_or(0))
        ),
        None if session.ledger().prayer_debt == 0 => {
            println_colored!(GREEN, "  Prayers: nothing owed ✓")
        }
        None => println_colored!(AMBER, "  Prayers: no projection for a rate of {}", rate),
    }
    match session.project_fasting_completion(fasting_rate, now) {
        Some(done) => println_colored!(
            BOLD,
            "  Fasts:   clear by {} at {}/day",
            done.format("%Y-%m-%d"),
            fasting_rate
        ),
        None if session.ledger().fasting_debt == 0 => {
            println_colored!(GREEN, "  Fasts:   nothing owed ✓")
        }
        None => println_colored!(AMBER, "  Fasts:   no projection for a rate of {}", fasting_rate),
    }
    println!();
    Ok(())
}

// ─── External progress ───────────────────────────────────────────────────────

pub fn handle_progress(
    conn: &Connection,
    session: &mut Session,
    action: &ProgressCommands,
) -> Result<()> {
    match action {
        ProgressCommands::Surah { count } => {
            let total = ProgressRepo::increment(conn, ProgressKind::SurahsRead, *count)?;
            println_colored!(GREEN, "  ✓ Surahs read: {}", total);
        }
        ProgressCommands::Tajwid { count } => {
            let total = ProgressRepo::increment(conn, ProgressKind::TajwidLessons, *count)?;
            println_colored!(GREEN, "  ✓ Tajwid lessons: {}", total);
        }
        ProgressCommands::Story { id } => {
            if ProgressRepo::complete_story(conn, id)? {
                println_colored!(GREEN, "  ✓ Story completed: {}", id);
            } else {
                println_colored!(DIM, "  Story '{}' was already completed", id);
            }
        }
        ProgressCommands::Wudu => {
            if session.complete_wudu_guide() {
                println_colored!(GREEN, "  ✓ Wudu guide completed");
            } else {
                println_colored!(DIM, "  Wudu guide was already completed");
            }
        }
    }
    Ok(())
}

// ─── Notifications ───────────────────────────────────────────────────────────

/// Evaluate badges, show any pending level-up or badge, then acknowledge both.
pub fn announce(conn: &Connection, session: &mut Session) -> Result<()> {
    let progress = ProgressRepo::load(conn)?;
    let newly = session.evaluate_badges(&progress);

    if session.experience().level_up_pending {
        println_colored!(GOLD, "  ★ Level up! You are now level {}", session.experience().level);
        session.acknowledge_level_up();
    }

    if let Some(id) = session.badges().last_unlocked_badge_id.clone() {
        if let Some(badge) = BadgeDef::get(&id) {
            println_colored!(
                GOLD,
                "  ◆ Badge unlocked: {} ({})",
                badge.name,
                badge.category.label()
            );
        }
        if newly.len() > 1 {
            println_colored!(DIM, "    and {} more", newly.len() - 1);
        }
        session.acknowledge_badge();
    }
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(&session.snapshot()).context("Serializing snapshot")?;
    println!("{}", json);
    Ok(())
}
