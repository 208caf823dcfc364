//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! Both grouping stages of the pipeline share one primitive,
//! [`KeyedGroups`]: collect items under a key, then keep only the keys
//! that gathered two or more items. The size stage keys file paths by byte
//! length; the hash stage keys the survivors of one size bucket by content
//! digest.
//!
//! ## Size Grouping
//!
//! Files with different sizes cannot be duplicates, so grouping by exact
//! size discards most files before any content is read.
//!
//! # Example
//!
//! ```
//! use dupmanager::scanner::FileRecord;
//! use dupmanager::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::scanner::path_utils::comparison_key;
use crate::scanner::{ContentDigest, FileRecord};

/// Items gathered under ordered keys.
///
/// Insertion order is preserved inside each bucket and buckets iterate in
/// ascending key order, so the output depends only on the input sequence.
#[derive(Debug, Clone)]
pub struct KeyedGroups<K, T> {
    buckets: BTreeMap<K, Vec<T>>,
}

impl<K: Ord, T> Default for KeyedGroups<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, T> KeyedGroups<K, T> {
    /// Create an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Append `item` to the bucket for `key`.
    pub fn insert(&mut self, key: K, item: T) {
        self.buckets.entry(key).or_default().push(item);
    }

    /// Number of distinct keys seen.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of items across all buckets.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check whether nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Keep only buckets with two or more items, in ascending key order.
    #[must_use]
    pub fn into_multi_member(self) -> Vec<(K, Vec<T>)> {
        self.buckets
            .into_iter()
            .filter(|(_, items)| items.len() > 1)
            .collect()
    }
}

/// Group `items` by `key` and keep only keys shared by two or more items.
///
/// # Example
///
/// ```
/// use dupmanager::duplicates::group_and_filter;
///
/// let groups = group_and_filter(vec![3, 1, 4, 1, 5, 9, 2, 6], |n| n % 2);
/// assert_eq!(groups, vec![(0, vec![4, 2, 6]), (1, vec![3, 1, 1, 5, 9])]);
/// ```
pub fn group_and_filter<K, T, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups = KeyedGroups::new();
    for item in items {
        groups.insert(key(&item), item);
    }
    groups.into_multi_member()
}

/// A group of files with the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in discovery order
    pub paths: Vec<PathBuf>,
}

impl SizeGroup {
    /// Create a size group with its member paths.
    #[must_use]
    pub fn new(size: u64, paths: Vec<PathBuf>) -> Self {
        Self { size, paths }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Confirmed duplicate group: files with equal size and equal digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashGroup {
    /// SHA-256 digest shared by every member
    pub digest: ContentDigest,
    /// File size in bytes
    pub size: u64,
    /// Member paths, in the order they were hashed
    pub paths: Vec<PathBuf>,
}

impl HashGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: ContentDigest, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Digest as lowercase hexadecimal.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Space taken by the copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Statistics from the size grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
    /// Records dropped because their path was already in the bucket
    pub repeated_paths: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Incremental size grouper.
///
/// Feed it records as the walker produces them, then call
/// [`SizeGrouper::finish`]. A path that is already present in its size
/// bucket (compared case-insensitively after NFC normalization) is ignored.
#[derive(Debug, Default)]
pub struct SizeGrouper {
    groups: KeyedGroups<u64, PathBuf>,
    seen: HashSet<(u64, String)>,
    stats: GroupingStats,
}

impl SizeGrouper {
    /// Create an empty grouper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Returns false if the path was a repeat.
    pub fn add(&mut self, record: FileRecord) -> bool {
        if !self.seen.insert((record.size, comparison_key(&record.path))) {
            log::debug!("Ignoring repeated path: {}", record.path.display());
            self.stats.repeated_paths += 1;
            return false;
        }

        self.stats.total_files += 1;
        self.stats.total_size += record.size;
        self.groups.insert(record.size, record.path);
        true
    }

    /// Number of records accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.total_files
    }

    /// Check whether no record has been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.total_files == 0
    }

    /// Emit the size groups with two or more members, smallest size first.
    #[must_use]
    pub fn finish(self) -> (Vec<SizeGroup>, GroupingStats) {
        let mut stats = self.stats;
        stats.unique_sizes = self.groups.key_count();

        let groups: Vec<SizeGroup> = self
            .groups
            .into_multi_member()
            .into_iter()
            .map(|(size, paths)| SizeGroup::new(size, paths))
            .collect();

        stats.duplicate_groups = groups.len();
        stats.potential_duplicates = groups.iter().map(SizeGroup::len).sum();
        stats.eliminated_unique = stats.total_files - stats.potential_duplicates;

        log::info!(
            "Size grouping complete: {} files -> {} potential duplicates ({:.1}% eliminated)",
            stats.total_files,
            stats.potential_duplicates,
            stats.elimination_rate()
        );

        (groups, stats)
    }
}

/// Group files by size.
///
/// # Returns
///
/// A tuple of:
/// - `Vec<SizeGroup>` - Groups with 2+ files, in ascending size order
/// - `GroupingStats` - Statistics about the grouping operation
///
/// # Example
///
/// ```
/// use dupmanager::scanner::FileRecord;
/// use dupmanager::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].size, 100);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileRecord>) -> (Vec<SizeGroup>, GroupingStats) {
    let mut grouper = SizeGrouper::new();
    for file in files {
        grouper.add(file);
    }
    grouper.finish()
}
