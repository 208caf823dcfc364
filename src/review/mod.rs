//! Review and quarantine of confirmed duplicate groups.
//!
//! Every group goes through the same states:
//!
//! ```text
//! Presented -> SelectionEntered -> Confirming -> Confirmed -> Done
//!                     |                  |
//!                     | (empty)          +-> Declined -> Done
//!                     +-> Done
//! ```
//!
//! Nothing on disk changes before `Confirmed`, and confirmation covers the
//! whole selection. The operator is abstracted by the [`Operator`] trait;
//! [`ConsoleOperator`] is the terminal implementation.

pub mod console;
pub mod input;

use std::io;
use std::sync::Arc;

pub use console::ConsoleOperator;
pub use input::{parse_confirmation, parse_indices, parse_roots, InputError};

use crate::duplicates::HashGroup;
use crate::quarantine::{quarantine_batch, BatchQuarantineResult, QuarantineProgressCallback, VolumeLocator};

/// The person deciding what happens to each duplicate group.
pub trait Operator {
    /// Show a group. `case_number` counts from 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be reached.
    fn present(&mut self, case_number: usize, group: &HashGroup) -> io::Result<()>;

    /// Ask which members to quarantine.
    ///
    /// Returned indices must be distinct and within the group; an empty
    /// selection skips the group.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be reached.
    fn select(&mut self, group: &HashGroup) -> io::Result<Vec<usize>>;

    /// Ask for a yes/no decision on the whole selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be reached.
    fn confirm(&mut self, group: &HashGroup, selection: &[usize]) -> io::Result<bool>;

    /// Receiver for per-file status while a confirmed selection is moved.
    fn status_sink(&self) -> Option<&dyn QuarantineProgressCallback> {
        None
    }
}

/// What happened to one group.
#[derive(Debug, Clone)]
pub enum GroupOutcome {
    /// The operator selected nothing.
    Skipped,
    /// The operator declined the confirmation.
    Declined,
    /// The selection was confirmed and processed.
    Quarantined(BatchQuarantineResult),
}

/// States of the per-group review.
#[derive(Debug, Clone)]
pub enum ReviewState {
    /// The group has been shown.
    Presented,
    /// The operator entered a selection.
    SelectionEntered(Vec<usize>),
    /// Waiting for the yes/no decision.
    Confirming(Vec<usize>),
    /// The selection is being moved.
    Confirmed(Vec<usize>),
    /// The selection was rejected.
    Declined,
    /// Terminal state.
    Done(GroupOutcome),
}

impl ReviewState {
    /// Short state name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Presented => "presented",
            Self::SelectionEntered(_) => "selection-entered",
            Self::Confirming(_) => "confirming",
            Self::Confirmed(_) => "confirmed",
            Self::Declined => "declined",
            Self::Done(_) => "done",
        }
    }
}

/// Run one group through the review states.
///
/// # Errors
///
/// Propagates operator I/O errors. Relocation failures are not errors;
/// they are part of the returned [`GroupOutcome::Quarantined`] result.
pub fn review_group(
    case_number: usize,
    group: &HashGroup,
    operator: &mut dyn Operator,
    locator: &dyn VolumeLocator,
) -> io::Result<GroupOutcome> {
    operator.present(case_number, group)?;
    let mut state = ReviewState::Presented;

    loop {
        log::trace!("Case {}: {}", case_number, state.name());
        state = match state {
            ReviewState::Presented => ReviewState::SelectionEntered(operator.select(group)?),
            ReviewState::SelectionEntered(selection) if selection.is_empty() => {
                log::debug!("Case {}: nothing selected", case_number);
                ReviewState::Done(GroupOutcome::Skipped)
            }
            ReviewState::SelectionEntered(selection) => ReviewState::Confirming(selection),
            ReviewState::Confirming(selection) => {
                if operator.confirm(group, &selection)? {
                    ReviewState::Confirmed(selection)
                } else {
                    ReviewState::Declined
                }
            }
            ReviewState::Confirmed(selection) => {
                let result = quarantine_batch(&group.paths, &selection, locator, operator.status_sink());
                ReviewState::Done(GroupOutcome::Quarantined(result))
            }
            ReviewState::Declined => {
                log::info!("Case {}: declined, nothing moved", case_number);
                ReviewState::Done(GroupOutcome::Declined)
            }
            ReviewState::Done(outcome) => return Ok(outcome),
        };
    }
}

/// Totals over a full review session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Groups presented
    pub cases: usize,
    /// Groups with an empty selection
    pub skipped: usize,
    /// Groups whose selection was declined
    pub declined: usize,
    /// Files moved into quarantine
    pub moved: usize,
    /// Selected files that could not be moved
    pub failed: usize,
    /// Moved files missing from the manifest
    pub unrecorded: usize,
}

impl ReviewSummary {
    fn record(&mut self, outcome: &GroupOutcome) {
        self.cases += 1;
        match outcome {
            GroupOutcome::Skipped => self.skipped += 1,
            GroupOutcome::Declined => self.declined += 1,
            GroupOutcome::Quarantined(result) => {
                self.moved += result.success_count();
                self.failed += result.failure_count();
                self.unrecorded += result.manifest_failures.len();
            }
        }
    }
}

/// Drives the review of every duplicate group.
#[derive(Debug, Clone)]
pub struct Reviewer {
    locator: Arc<dyn VolumeLocator>,
}

impl Reviewer {
    /// Create a reviewer that quarantines on the volumes found by `locator`.
    #[must_use]
    pub fn new(locator: Arc<dyn VolumeLocator>) -> Self {
        Self { locator }
    }

    /// Review all groups in ascending digest order.
    ///
    /// # Errors
    ///
    /// Stops at the first operator I/O error (for example closed input).
    /// Moves already made stay in place.
    pub fn review_all(&self, mut groups: Vec<HashGroup>, operator: &mut dyn Operator) -> io::Result<ReviewSummary> {
        groups.sort_by(|a, b| a.digest.cmp(&b.digest).then(a.size.cmp(&b.size)));

        let mut summary = ReviewSummary::default();
        for (i, group) in groups.iter().enumerate() {
            let outcome = review_group(i + 1, group, operator, self.locator.as_ref())?;
            summary.record(&outcome);
        }

        log::info!(
            "Review complete: {} cases, {} moved, {} failed, {} declined, {} skipped",
            summary.cases,
            summary.moved,
            summary.failed,
            summary.declined,
            summary.skipped
        );
        Ok(summary)
    }
}
