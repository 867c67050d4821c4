//! Appraisal checklists: answer model, instrument schema, scoring engine and
//! two-reviewer reconciliation.
//!
//! Checklist documents are owned by the caller. Every operation here reads a
//! document and derives a result from it; nothing is stored or mutated.

pub mod answer;
pub mod domain;
pub mod factory;
pub mod judgement;
pub mod reconcile;
pub mod router;
pub mod schema;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use answer::{Answer, AnswerSet, UnknownAnswer};
pub use domain::{
    Amstar2Form, AnswerLookup, Checklist, ChecklistBody, ChecklistId, DomainResponse,
    EffectOfInterest, Instrument, QuestionResponse, Rob2Form, Rob2Preliminary, RobinsForm,
    RobinsPreliminary, StagedAnswer,
};
pub use factory::{create, ChecklistError, NewChecklist};
pub use judgement::{BiasDirection, ConfidenceRating, Rob2Judgement, RobinsJudgement, Severity};
pub use reconcile::{
    compare, compare_json, reconcile, Comparison, ComparisonStats, ReconcileChoice,
    ReconcileError, ReconcileRequest, ReconcileTarget, ReconciledChecklist,
};
pub use router::checklist_router;
pub use schema::InstrumentSchema;
pub use scoring::{
    score_checklist, score_json, AmstarScore, AmstarVerdict, ChecklistScore, DomainScore,
    ScoreReport, ScoringResult,
};
