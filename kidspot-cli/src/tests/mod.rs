//! Shared test harness modules for the Kidspot CLI.

use super::*;

mod helpers;
mod rank_steps;
