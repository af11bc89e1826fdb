//! Quay CLI library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod cli;
pub mod command_runner;
pub mod commands;
pub mod compose;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod store;
pub mod tunnel;
