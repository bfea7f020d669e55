//! installgen-lib: asset dependency engine for cluster install artifacts
//!
//! This crate provides the pieces needed to turn a validated install config
//! into a directory of deployable files:
//! - `Asset`: a named unit of work with explicit dependencies
//! - `Resolver`/`Engine`: resolve a dependency graph exactly once per asset
//! - `Bundle`: the aggregated, collision-checked output of a run
//! - Producers for the install config, network operator, DNS and manifests

pub mod asset;
pub mod consts;
pub mod dns;
pub mod execute;
pub mod installconfig;
pub mod manifests;
pub mod meta;
pub mod network;
pub mod output;
pub mod platform;
pub mod registry;
pub mod targets;
pub mod util;
