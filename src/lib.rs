//! Weighted, scenario-driven grading of submitted exam artifacts.
//!
//! The `grade` binary loads a submission as an [`artifact`], runs the
//! [`exam`] bank through the [`grading`] engine, and renders the result with
//! [`report`].
pub mod artifact;
pub mod assertions;
pub mod cli;
pub mod config;
pub mod exam;
pub mod grading;
pub mod report;
pub mod util;
