//! Range-bar aggregation for the ranger toolkit.
//!
//! This crate turns ordered trade ticks into range bars:
//!
//! - [`RangeBar`] - Range bar data structure
//! - [`RangeBarConfig`] / [`GapPolicy`] - Threshold and gap settings
//! - [`RangeBarAggregator`] - Streaming aggregator
//! - [`aggregate`] / [`count_bars`] - Whole-sequence helpers
//! - [`TimestampDeduplicator`] / [`dedupe_timestamps`] - Unique timestamps for output

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod bar;
mod config;
mod dedupe;
mod error;
mod gap;

pub use aggregator::{RangeBarAggregator, aggregate, count_bars};
pub use bar::RangeBar;
pub use config::RangeBarConfig;
pub use dedupe::{Timestamped, TimestampDeduplicator, dedupe_timestamps};
pub use error::AggregateError;
pub use gap::{Breakout, GapPolicy, infer_tick_size};
