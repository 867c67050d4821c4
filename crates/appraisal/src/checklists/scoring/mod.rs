//! Scoring engine: per-domain decision trees, part combinators, whole-checklist
//! aggregation and the flaw-counting quality rating.
//!
//! Every entry point is a pure function of the checklist it is handed. Nothing
//! is cached between calls and the checklist is never mutated.

pub mod amstar;
mod combine;
pub mod rob2;
pub mod robins;
pub mod tree;

pub use amstar::{AmstarScore, AmstarVerdict, QuestionScore};
pub use combine::worst_of;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Checklist, ChecklistBody, DomainResponse, EffectOfInterest};
use super::judgement::{worst, BiasDirection, Rob2Judgement, RobinsJudgement, Severity};
use super::schema::{active_domains, DomainTemplate};

/// Outcome of one decision tree or combinator.
///
/// A judgement is present exactly when the result is complete; the rule id
/// names the leaf (or joined leaves) that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult<J> {
    judgement: Option<J>,
    is_complete: bool,
    rule_id: Option<String>,
}

impl<J: Copy> ScoringResult<J> {
    pub fn complete(judgement: J, rule: impl Into<String>) -> Self {
        Self {
            judgement: Some(judgement),
            is_complete: true,
            rule_id: Some(rule.into()),
        }
    }

    pub fn incomplete() -> Self {
        Self {
            judgement: None,
            is_complete: false,
            rule_id: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn judgement(&self) -> Option<J> {
        self.judgement
    }

    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }
}

/// Score of one domain of a tree-scored checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScore<J> {
    /// Result of the decision tree.
    pub auto: ScoringResult<J>,
    /// Independently scored parts, for domains that combine several trees.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ScoringResult<J>>,
    /// The reviewer's override when set, else the automatic judgement.
    pub judgement: Option<J>,
    pub overridden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<BiasDirection>,
    /// Whether the domain counts towards the overall judgement.
    pub active: bool,
}

impl<J: Copy> DomainScore<J> {
    pub(crate) fn new(
        auto: ScoringResult<J>,
        parts: Vec<ScoringResult<J>>,
        response: Option<&DomainResponse<J>>,
    ) -> Self {
        let reviewer = response.and_then(|response| response.judgement);
        Self {
            judgement: reviewer.or(auto.judgement()),
            overridden: reviewer.is_some(),
            direction: response.and_then(|response| response.direction),
            auto,
            parts,
            active: false,
        }
    }
}

/// Whole-checklist score of a tree-scored instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistScore<J> {
    pub domains: BTreeMap<String, DomainScore<J>>,
    pub active_domains: Vec<String>,
    pub overall: Option<J>,
    pub is_complete: bool,
    /// Set when an early-termination gate decided the assessment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<ScoringResult<J>>,
}

impl<J: Severity> ChecklistScore<J> {
    /// Score every domain template and derive the overall judgement from the
    /// automatic results of the domains the aim selects.
    pub(crate) fn aggregate(
        templates: &'static [DomainTemplate],
        aim: Option<EffectOfInterest>,
        mut score_domain: impl FnMut(&'static DomainTemplate) -> DomainScore<J>,
    ) -> Self {
        let active = active_domains(templates, aim);

        let mut domains = BTreeMap::new();
        for template in templates {
            let mut score = score_domain(template);
            score.active = active
                .as_ref()
                .is_some_and(|keys| keys.contains(&template.key));
            domains.insert(template.key.to_string(), score);
        }

        let Some(active) = active else {
            tracing::debug!("aim unset; overall judgement withheld");
            return Self {
                domains,
                active_domains: Vec::new(),
                overall: None,
                is_complete: false,
                gate: None,
            };
        };

        let results: Vec<&ScoringResult<J>> = active
            .iter()
            .filter_map(|key| domains.get(*key))
            .map(|score| &score.auto)
            .collect();
        let is_complete =
            results.len() == active.len() && results.iter().all(|result| result.is_complete());
        let overall = if is_complete {
            worst(results.iter().filter_map(|result| result.judgement()))
        } else {
            None
        };

        Self {
            domains,
            active_domains: active.iter().map(|key| key.to_string()).collect(),
            overall,
            is_complete,
            gate: None,
        }
    }

    /// Let a decisive gate result stand for the whole assessment.
    pub(crate) fn gated(mut self, gate: ScoringResult<J>) -> Self {
        self.overall = gate.judgement();
        self.is_complete = gate.is_complete();
        self.gate = Some(gate);
        self
    }
}

/// Whole-checklist outcome for any instrument, or the error sentinel for input
/// that is not a checklist at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "instrument")]
pub enum ScoreReport {
    #[serde(rename = "ROB2")]
    Rob2(ChecklistScore<Rob2Judgement>),
    #[serde(rename = "ROBINS_I")]
    RobinsI(ChecklistScore<RobinsJudgement>),
    #[serde(rename = "AMSTAR2")]
    Amstar2(AmstarScore),
    #[serde(rename = "ERROR")]
    Error { reason: String },
}

impl ScoreReport {
    pub fn is_complete(&self) -> bool {
        match self {
            ScoreReport::Rob2(score) => score.is_complete,
            ScoreReport::RobinsI(score) => score.is_complete,
            ScoreReport::Amstar2(score) => score.verdict.is_rated(),
            ScoreReport::Error { .. } => false,
        }
    }

    /// Published label of the overall outcome, including the sentinels.
    pub fn overall_label(&self) -> &'static str {
        match self {
            ScoreReport::Rob2(score) => score.overall.map_or("Incomplete", |overall| overall.label()),
            ScoreReport::RobinsI(score) => score.overall.map_or("Incomplete", |overall| overall.label()),
            ScoreReport::Amstar2(score) => score.verdict.label(),
            ScoreReport::Error { .. } => "Error",
        }
    }
}

/// Score a checklist with its instrument's algorithm.
pub fn score_checklist(checklist: &Checklist) -> ScoreReport {
    let report = match &checklist.body {
        ChecklistBody::Rob2(form) => ScoreReport::Rob2(rob2::score_form(form)),
        ChecklistBody::RobinsI(form) => ScoreReport::RobinsI(robins::score_form(form)),
        ChecklistBody::Amstar2(_) => ScoreReport::Amstar2(amstar::score(Some(checklist))),
    };
    tracing::debug!(
        checklist = %checklist.id,
        instrument = %checklist.instrument(),
        overall = report.overall_label(),
        "checklist scored"
    );
    report
}

/// Score a checklist document that has not been decoded yet. Anything that
/// does not decode as a checklist yields the error sentinel.
pub fn score_json(document: &Value) -> ScoreReport {
    match Checklist::deserialize(document) {
        Ok(checklist) => score_checklist(&checklist),
        Err(err) => {
            tracing::debug!(error = %err, "document is not a checklist");
            ScoreReport::Error {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_result_has_no_judgement_or_rule() {
        let result = ScoringResult::<Rob2Judgement>::incomplete();
        assert!(!result.is_complete());
        assert_eq!(result.judgement(), None);
        assert_eq!(result.rule_id(), None);
    }

    #[test]
    fn result_serializes_with_snake_case_fields() {
        let result = ScoringResult::complete(Rob2Judgement::Low, "D1.R3");
        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["judgement"], "Low");
        assert_eq!(value["is_complete"], true);
        assert_eq!(value["rule_id"], "D1.R3");
    }

    #[test]
    fn reviewer_override_replaces_only_the_reported_judgement() {
        let response = DomainResponse {
            judgement: Some(Rob2Judgement::High),
            direction: Some(BiasDirection::TowardsNull),
            ..DomainResponse::default()
        };
        let score = DomainScore::new(
            ScoringResult::complete(Rob2Judgement::Low, "D1.R3"),
            Vec::new(),
            Some(&response),
        );
        assert_eq!(score.judgement, Some(Rob2Judgement::High));
        assert_eq!(score.auto.judgement(), Some(Rob2Judgement::Low));
        assert!(score.overridden);
        assert_eq!(score.direction, Some(BiasDirection::TowardsNull));
    }

    #[test]
    fn non_checklist_json_is_the_error_sentinel() {
        let report = score_json(&serde_json::json!({ "name": "no id or body" }));
        assert!(matches!(report, ScoreReport::Error { .. }));
        assert_eq!(report.overall_label(), "Error");
        assert!(!report.is_complete());
    }
}
