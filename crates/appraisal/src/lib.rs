//! Scoring and reconciliation engine for clinical-research appraisal
//! checklists: RoB 2 (randomized trials), ROBINS-I V2 (non-randomized studies
//! of interventions) and AMSTAR 2 (systematic reviews).

pub mod checklists;
pub mod config;
pub mod error;
pub mod telemetry;
