//! Qada debt and catch-up tracking
//!
//! Estimates a lifetime backlog of missed prayers and fasts, tracks the
//! five daily prayers, pays down debt, projects a completion date and
//! rewards progress with experience, levels and badges.

pub mod cli;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod utils;
