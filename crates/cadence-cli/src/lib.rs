//! HTTP API and configuration shared by the `cadence` binary and its tests.

pub mod api;
pub mod config;
