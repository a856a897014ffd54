use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qada", version, author, about = "Track and pay down missed prayers and fasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate your qada debt from a short questionnaire
    Setup {
        /// Your current age in years
        #[arg(long)]
        current_age: f64,
        /// Age at which prayer and fasting became obligatory
        #[arg(long)]
        puberty_age: f64,
        /// How regularly you prayed and fasted since then, in percent
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
        regularity: u8,
        /// Add a safety margin to the estimate
        #[arg(long)]
        safety_margin: bool,
        /// Apply the menstrual exemption to the prayer estimate
        #[arg(long)]
        female: bool,
        /// Replace an existing estimate
        #[arg(long)]
        reset: bool,
    },
    /// Show debt, today's prayers, level and badges
    Status,
    /// Mark one of today's prayers as prayed
    Mark {
        /// Prayer name (fajr, zuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Qada prayer catch-up
    Qada {
        #[command(subcommand)]
        action: QadaCommands,
    },
    /// Fasting debt and voluntary fasts
    Fast {
        #[command(subcommand)]
        action: FastCommands,
    },
    /// Project when your prayer debt will be cleared
    Project {
        /// Qada prayers per day (defaults to the configured rate)
        #[arg(long)]
        rate: Option<f64>,
        /// Fasts per day for the fasting projection
        #[arg(long)]
        fasting_rate: Option<f64>,
    },
    /// Record progress from Quran, Tajwid and story lessons
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
    /// Print the saved state as JSON
    Export,
}

#[derive(Subcommand, Debug)]
pub enum QadaCommands {
    /// Catch up one missed prayer
    Complete {
        /// How many to record at once
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Pray today's prayer and count it against the debt as well
    Double {
        /// Prayer name
        prayer: String,
    },
    /// Correct the remaining prayer debt by a signed amount
    Adjust {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum FastCommands {
    /// Log a fast (qada by default)
    Log {
        /// A voluntary fast that does not reduce debt
        #[arg(long)]
        voluntary: bool,
        /// Date of the fast, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Correct the remaining fasting debt by a signed amount
    AdjustDebt {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Correct the completed fast count by a signed amount
    AdjustCompleted {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Declare the intention to fast (defaults to tomorrow)
    Intend {
        /// Date of the intended fast, YYYY-MM-DD
        #[arg(long, conflicts_with = "clear")]
        date: Option<NaiveDate>,
        /// Clear the declared intention
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    /// Surahs read
    Surah {
        #[arg(default_value = "1")]
        count: u32,
    },
    /// Tajwid lessons completed
    Tajwid {
        #[arg(default_value = "1")]
        count: u32,
    },
    /// A prophet story finished (e.g. adam, nuh, ibrahim)
    Story { id: String },
    /// The wudu guide was completed
    Wudu,
}
