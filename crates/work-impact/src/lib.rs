// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! work-impact library
//!
//! This module exports the command layer of the `work-impact` binary for use
//! in integration tests and as a library.

pub mod analyzer;
pub mod commands;
pub mod config;
pub mod profile;
pub mod progress;
pub mod prompt;
pub mod storage;
