//! Shared test harness modules for the hazard CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod analyze_steps;
mod helpers;
