//! Adaptive threshold selection for the ranger toolkit.
//!
//! This crate searches for the range threshold that yields a target number
//! of bars per day:
//!
//! - [`TuneConfig`] / [`SearchStrategy`] - Target, step and search settings
//! - [`ThresholdSelector`] - Probes candidate thresholds against a day of ticks
//! - [`ProbeResult`] - Bar count per probed threshold
//! - [`select_threshold`] - One-call neighbour search

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod probe;
mod selector;

pub use config::{DEFAULT_STEP, DEFAULT_TARGET_BARS, SearchStrategy, TuneConfig};
pub use error::TuneError;
pub use probe::ProbeResult;
pub use selector::{ThresholdSelector, select_threshold};
