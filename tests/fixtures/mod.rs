// Shared test fixtures and utilities for integration tests
//
// This module provides:
// - Configuration fixtures (configs.rs)
// - Record builders, on-disk fixture writers and assertions (helpers.rs)

#![allow(dead_code)]

pub mod configs;
pub mod helpers;
