//! The tools module provides the helpers around the bitsub pipeline.
//!
//! The tools are:
//! - cli: Command line interface for bitsub.
//! - report: Size-change statistics and analysis output for the user.
//!
pub mod cli;
pub mod report;
