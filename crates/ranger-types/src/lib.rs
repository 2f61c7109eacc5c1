//! Core types for the ranger range-bar toolkit.
//!
//! This crate provides the fundamental data structures used throughout ranger:
//!
//! - [`Tick`] - A single trade with timestamp, price, and volume
//! - [`parse_timestamp`] / [`format_bar_time`] - Timestamp reading and rendering
//! - [`day_from_file_name`] - Trading date embedded in day-file names
//! - [`RangerError`] / [`ConfigError`] - Error taxonomy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod day;
mod error;
mod tick;
mod timestamp;

pub use day::{DAY_STEM_FORMAT, day_file_name, day_from_file_name};
pub use error::{ConfigError, RangerError, Result};
pub use rust_decimal::Decimal;
pub use tick::{Tick, first_unsorted};
pub use timestamp::{BAR_TIME_FORMAT, format_bar_time, parse_timestamp};
