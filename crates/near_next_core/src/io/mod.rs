//! File formats and command-line surface.

pub(crate) mod csv;
pub(crate) mod listing;
pub mod options;
pub mod records;
pub(crate) mod report;
