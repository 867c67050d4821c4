//! Comparison of two reviewers' checklists and construction of the consensus
//! checklist.

mod compare;
mod merge;

pub use compare::{
    compare, compare_json, Comparison, ComparisonStats, DomainComparison, QuestionComparison,
};
pub use merge::{
    reconcile, Provenance, QuestionValue, ReconcileChoice, ReconcileRequest, ReconcileTarget,
    ReconciledChecklist,
};

use thiserror::Error;

use super::domain::Instrument;
use super::factory::ChecklistError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("cannot combine a {left} checklist with a {right} checklist")]
    InstrumentMismatch { left: Instrument, right: Instrument },
    #[error("override for {key} must be {expected}")]
    OverrideKind { key: String, expected: &'static str },
    #[error("checklist {checklist} is invalid: {reason}")]
    InvalidSource { checklist: String, reason: String },
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
}
