//! # appdata-cleaner
//!
//! Accounts for and cleans per-application data directories.
//!
//! - **Inventory**: known applications from a registry plus `harbour-*`
//!   style apps discovered in the XDG config, cache and data roots
//! - **Usage**: bytes per application and per category (config, cache, local data)
//! - **Installed state**: apps without a `.desktop` descriptor count as unused
//! - **Cleaning**: delete data for one app, or for every unused app at once
//! - **Live model**: a serialized background worker mutates an observable
//!   store while readers keep working

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod coordinator;
pub mod scanner;
pub mod store;
