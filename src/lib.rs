//! Earnings Engine
//!
//! This crate turns a single declared pay rate and work schedule into a full
//! earnings breakdown: gross pay, itemized tax deductions, net pay and work
//! unit counts, expressed per year, month, week, day and hour. Tax rule sets
//! are loaded per country and variant from YAML, and every calculation input
//! round-trips through a compact share-link query.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod share;
