//! Duplicate finder orchestrating the detection pipeline.
//!
//! # Overview
//!
//! The pipeline is strictly sequential:
//!
//! 1. **Walk**: every root is enumerated and each file record is fed
//!    straight into the size grouper.
//! 2. **Size grouping**: singleton sizes are discarded.
//! 3. **Hash grouping**: every member of a surviving size group is
//!    digested with SHA-256 and grouped by digest within that size group.
//!
//! Failures never abort the pipeline. Walk errors are collected into
//! [`ScanSummary::scan_errors`]; unreadable files are dropped from their
//! group and their distinct messages reported once after hashing.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{GroupingStats, HashGroup, KeyedGroups, SizeGroup, SizeGrouper};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::quarantine::{MountPointLocator, VolumeLocator};
use crate::scanner::{ContentDigest, ExclusionRules, Hasher, ScanError, Walker, DEFAULT_CHUNK_SIZE};

/// Hashing progress: files digested so far against the candidate total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashProgress {
    /// Files successfully hashed
    pub hashed: usize,
    /// Files in multi-member size groups
    pub total: usize,
}

/// Output of the hash grouping stage.
#[derive(Debug, Clone, Default)]
pub struct HashReport {
    /// Confirmed duplicate groups, ascending by digest
    pub groups: Vec<HashGroup>,
    /// Final progress value
    pub progress: HashProgress,
    /// Distinct failure messages, sorted
    pub failures: Vec<String>,
}

/// Group the members of each size group by content digest.
///
/// Digests are only compared within one size group. Files that cannot be
/// read are left out of their group; each distinct failure message is
/// logged once after all groups are processed.
///
/// # Example
///
/// ```no_run
/// use dupmanager::duplicates::{group_by_hash, SizeGroup};
/// use dupmanager::scanner::Hasher;
/// use std::path::PathBuf;
///
/// let groups = vec![SizeGroup::new(3, vec![PathBuf::from("/a"), PathBuf::from("/b")])];
/// let report = group_by_hash(groups, &Hasher::new(), None);
/// println!("{} duplicate groups", report.groups.len());
/// ```
#[must_use]
pub fn group_by_hash(
    size_groups: Vec<SizeGroup>,
    hasher: &Hasher,
    progress_callback: Option<&dyn ProgressCallback>,
) -> HashReport {
    let total: usize = size_groups.iter().map(SizeGroup::len).sum();
    let mut progress = HashProgress { hashed: 0, total };
    let mut failures = BTreeSet::new();
    let mut groups = Vec::new();

    if let Some(callback) = progress_callback {
        callback.on_phase_start(PHASE_HASHING, total);
    }

    for size_group in size_groups {
        let mut by_digest: KeyedGroups<ContentDigest, PathBuf> = KeyedGroups::new();

        for path in size_group.paths {
            match hasher.digest(&path) {
                Ok(digest) => {
                    progress.hashed += 1;
                    if let Some(callback) = progress_callback {
                        callback.on_progress(progress.hashed, &path.to_string_lossy());
                    }
                    by_digest.insert(digest, path);
                }
                Err(e) => {
                    log::debug!("Dropping {} from size group {}: {}", path.display(), size_group.size, e);
                    failures.insert(e.to_string());
                }
            }
        }

        groups.extend(
            by_digest
                .into_multi_member()
                .into_iter()
                .map(|(digest, paths)| HashGroup::new(digest, size_group.size, paths)),
        );
    }

    groups.sort_by(|a, b| a.digest.cmp(&b.digest).then(a.size.cmp(&b.size)));

    if let Some(callback) = progress_callback {
        callback.on_phase_end(PHASE_HASHING);
    }

    for failure in &failures {
        log::warn!("{}", failure);
    }

    log::info!(
        "Hash grouping complete: {} of {} files hashed, {} duplicate groups",
        progress.hashed,
        progress.total,
        groups.len()
    );

    HashReport {
        groups,
        progress,
        failures: failures.into_iter().collect(),
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Bytes read per chunk while hashing
    pub chunk_size: usize,
    /// Exclusion rules for the walk
    pub rules: ExclusionRules,
    /// Volume resolution for quarantine preparation
    pub locator: Arc<dyn VolumeLocator>,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("chunk_size", &self.chunk_size)
            .field("rules", &self.rules)
            .field("locator", &self.locator)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            rules: ExclusionRules::for_host(),
            locator: Arc::new(MountPointLocator),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the hashing chunk size (minimum 1).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the exclusion rules.
    #[must_use]
    pub fn with_rules(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the volume locator.
    #[must_use]
    pub fn with_locator(mut self, locator: Arc<dyn VolumeLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Set a progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Files sharing their size with at least one other file
    pub size_candidates: usize,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Errors encountered during the walk
    pub scan_errors: Vec<ScanError>,
    /// Distinct hashing failure messages
    pub hash_failures: Vec<String>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }

    fn record_grouping(&mut self, stats: &GroupingStats) {
        self.total_files = stats.total_files;
        self.total_size = stats.total_size;
        self.size_candidates = stats.potential_duplicates;
        self.eliminated_by_size = stats.eliminated_unique;
    }

    fn record_hashing(&mut self, report: &HashReport) {
        self.hashed_files = report.progress.hashed;
        self.duplicate_groups = report.groups.len();
        self.duplicate_files = report.groups.iter().map(HashGroup::duplicate_count).sum();
        self.reclaimable_space = report.groups.iter().map(HashGroup::wasted_space).sum();
        self.hash_failures = report.failures.clone();
    }
}

/// Duplicate finder that runs the walk, size and hash stages in order.
///
/// # Example
///
/// ```no_run
/// use dupmanager::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let finder = DuplicateFinder::new(FinderConfig::default());
/// let (groups, summary) = finder.find_duplicates(&[PathBuf::from("/data")]);
///
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::with_chunk_size(config.chunk_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given roots.
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `Vec<HashGroup>` - Confirmed duplicate groups, ascending by digest
    /// - `ScanSummary` - Statistics about the scan
    #[must_use]
    pub fn find_duplicates(&self, roots: &[PathBuf]) -> (Vec<HashGroup>, ScanSummary) {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let (size_groups, stats) = self.walk_and_group(roots, &mut summary.scan_errors);
        summary.record_grouping(&stats);
        log::info!("files: {} with same size", stats.potential_duplicates);

        let report = group_by_hash(size_groups, &self.hasher, self.config.progress_callback.as_deref());
        summary.record_hashing(&report);
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} reclaimable, {:.2?}",
            summary.duplicate_groups,
            summary.reclaimable_display(),
            summary.scan_duration
        );

        (report.groups, summary)
    }

    /// Walk every root and feed records into the size grouper.
    fn walk_and_group(&self, roots: &[PathBuf], errors: &mut Vec<ScanError>) -> (Vec<SizeGroup>, GroupingStats) {
        let mut walker = Walker::new(roots.to_vec(), self.config.rules.clone())
            .with_locator(self.config.locator.clone());
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut grouper = SizeGrouper::new();
        for result in walker.walk() {
            match result {
                Ok(record) => {
                    grouper.add(record);
                }
                Err(e) => errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        grouper.finish()
    }
}
