//! Integration tests for snapshot materialization.
//!
//! These tests walk through the full lifecycle the crates are built for:
//! plan links from a live checkpoint, write and install the manifest,
//! move the packaged directory, and replay it on the other side. Unit
//! tests in crates/*/src cover each step in isolation.

#![cfg(unix)]

#[path = "../common/mod.rs"]
mod common;

mod snapshot_transfer;
