//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod dedupe;
pub(crate) mod extend;
pub(crate) mod files;
pub(crate) mod show;
