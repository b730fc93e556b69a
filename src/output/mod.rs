//! Output rendering and export

pub mod report;
