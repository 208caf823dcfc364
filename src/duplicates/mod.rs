//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The group-and-filter primitive shared by both grouping stages
//! - Size-based file grouping
//! - SHA-256 content grouping within each size group
//! - Pipeline orchestration and scan statistics

pub mod finder;
pub mod groups;

pub use finder::{group_by_hash, DuplicateFinder, FinderConfig, HashProgress, HashReport, ScanSummary};
pub use groups::{
    group_and_filter, group_by_size, GroupingStats, HashGroup, KeyedGroups, SizeGroup, SizeGrouper,
};
