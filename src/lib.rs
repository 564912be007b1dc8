//! dep-updater - Interactive npm dependency upgrade selector library
//!
//! This library provides the pieces behind the `dep-updater` binary:
//! - Manifest discovery for single packages and workspaces (npm, yarn, pnpm)
//! - Registry lookups and per-tier upgrade classification
//! - The interactive selection model and its terminal front end
//! - Manifest rewriting followed by a single install

pub mod catalog;
pub mod cli;
pub mod controller;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod tui;
pub mod update;
