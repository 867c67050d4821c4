use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checklists::answer;
use crate::checklists::domain::{
    Amstar2Form, Checklist, ChecklistBody, DomainResponse, Instrument, QuestionResponse,
    StagedAnswer,
};
use crate::checklists::judgement::Severity;
use crate::checklists::schema::{amstar, rob2, robins, DomainTemplate};
use crate::checklists::scoring::amstar::read_label;
use crate::checklists::scoring::{score_checklist, DomainScore, ScoreReport};

use super::ReconcileError;

/// Agreement record for one stored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionComparison {
    pub key: String,
    /// Owning domain, or `triage` for gate questions; absent for the quality tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub reviewer1: Option<String>,
    pub reviewer2: Option<String>,
    pub final_match: bool,
    pub critical_match: bool,
    pub detailed_match: bool,
    pub critical: bool,
}

impl QuestionComparison {
    pub fn is_agreement(&self) -> bool {
        self.final_match && self.critical_match
    }
}

/// Automatic judgements of one domain side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainComparison {
    pub domain: String,
    pub reviewer1: Option<String>,
    pub reviewer2: Option<String>,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonStats {
    pub total: usize,
    pub agreements: usize,
    pub disagreements: usize,
    pub agreement_rate: f64,
    pub critical_disagreements: usize,
    pub non_critical_disagreements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub instrument: Instrument,
    pub agreements: Vec<QuestionComparison>,
    pub disagreements: Vec<QuestionComparison>,
    pub stats: ComparisonStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<DomainComparison>,
}

/// Compare two checklists of the same instrument question by question.
pub fn compare(
    reviewer1: &Checklist,
    reviewer2: &Checklist,
) -> Result<Comparison, ReconcileError> {
    let questions = match (&reviewer1.body, &reviewer2.body) {
        (ChecklistBody::Rob2(first), ChecklistBody::Rob2(second)) => {
            compare_domains(rob2::DOMAINS, &first.domains, &second.domains)
        }
        (ChecklistBody::RobinsI(first), ChecklistBody::RobinsI(second)) => {
            let mut rows: Vec<QuestionComparison> = robins::TRIAGE
                .iter()
                .map(|question| {
                    compare_responses(
                        question.key,
                        Some("triage"),
                        first.triage.get(question.key),
                        second.triage.get(question.key),
                    )
                })
                .collect();
            rows.extend(compare_domains(robins::DOMAINS, &first.domains, &second.domains));
            rows
        }
        (ChecklistBody::Amstar2(first), ChecklistBody::Amstar2(second)) => {
            compare_staged(reviewer1, first, reviewer2, second)?
        }
        (left, right) => {
            return Err(ReconcileError::InstrumentMismatch {
                left: left.instrument(),
                right: right.instrument(),
            })
        }
    };

    let domains = compare_judgements(&score_checklist(reviewer1), &score_checklist(reviewer2));
    let (agreements, disagreements): (Vec<_>, Vec<_>) =
        questions.into_iter().partition(QuestionComparison::is_agreement);
    let stats = stats(&agreements, &disagreements);

    tracing::debug!(
        reviewer1 = %reviewer1.id,
        reviewer2 = %reviewer2.id,
        agreements = stats.agreements,
        disagreements = stats.disagreements,
        "checklists compared"
    );

    Ok(Comparison {
        instrument: reviewer1.instrument(),
        agreements,
        disagreements,
        stats,
        domains,
    })
}

/// Compare two undecoded checklist documents.
pub fn compare_json(reviewer1: &Value, reviewer2: &Value) -> Result<Comparison, ReconcileError> {
    let first = decode(reviewer1, "reviewer1")?;
    let second = decode(reviewer2, "reviewer2")?;
    compare(&first, &second)
}

fn decode(document: &Value, role: &str) -> Result<Checklist, ReconcileError> {
    Checklist::deserialize(document).map_err(|err| ReconcileError::InvalidSource {
        checklist: role.to_string(),
        reason: err.to_string(),
    })
}

fn compare_domains<J>(
    templates: &'static [DomainTemplate],
    first: &BTreeMap<String, DomainResponse<J>>,
    second: &BTreeMap<String, DomainResponse<J>>,
) -> Vec<QuestionComparison> {
    templates
        .iter()
        .flat_map(|template| {
            template.questions.iter().map(move |question| {
                compare_responses(
                    question.key,
                    Some(template.key),
                    first
                        .get(template.key)
                        .and_then(|domain| domain.answers.get(question.key)),
                    second
                        .get(template.key)
                        .and_then(|domain| domain.answers.get(question.key)),
                )
            })
        })
        .collect()
}

fn compare_responses(
    key: &str,
    domain: Option<&str>,
    first: Option<&QuestionResponse>,
    second: Option<&QuestionResponse>,
) -> QuestionComparison {
    let first_answer = first.and_then(|response| response.answer);
    let second_answer = second.and_then(|response| response.answer);
    let first_comment = first.and_then(|response| response.comment.as_deref());
    let second_comment = second.and_then(|response| response.comment.as_deref());

    QuestionComparison {
        key: key.to_string(),
        domain: domain.map(str::to_string),
        reviewer1: first_answer.map(|answer| answer.code().to_string()),
        reviewer2: second_answer.map(|answer| answer.code().to_string()),
        final_match: answer::normalize(first_answer) == answer::normalize(second_answer),
        critical_match: true,
        detailed_match: first_answer == second_answer && first_comment == second_comment,
        critical: false,
    }
}

fn compare_staged(
    reviewer1: &Checklist,
    first: &Amstar2Form,
    reviewer2: &Checklist,
    second: &Amstar2Form,
) -> Result<Vec<QuestionComparison>, ReconcileError> {
    let invalid = |checklist: &Checklist, reason: String| ReconcileError::InvalidSource {
        checklist: checklist.id.to_string(),
        reason,
    };

    amstar::QUESTIONS
        .iter()
        .map(|template| {
            let first_label =
                read_label(first, template.key).map_err(|err| invalid(reviewer1, err.to_string()))?;
            let second_label =
                read_label(second, template.key).map_err(|err| invalid(reviewer2, err.to_string()))?;
            let first_answer = first.questions.get(template.key);
            let second_answer = second.questions.get(template.key);
            let first_critical = first_answer.is_some_and(|answer| answer.critical);
            let second_critical = second_answer.is_some_and(|answer| answer.critical);

            Ok::<_, ReconcileError>(QuestionComparison {
                key: template.key.to_string(),
                domain: None,
                reviewer1: first_label.map(|label| label.label().to_string()),
                reviewer2: second_label.map(|label| label.label().to_string()),
                final_match: first_label == second_label,
                critical_match: first_critical == second_critical,
                detailed_match: stages(first_answer) == stages(second_answer),
                critical: first_critical || second_critical,
            })
        })
        .collect()
}

fn stages(answer: Option<&StagedAnswer>) -> &[Option<usize>] {
    answer
        .map(|answer| answer.stages.as_slice())
        .unwrap_or_default()
}

fn compare_judgements(first: &ScoreReport, second: &ScoreReport) -> Vec<DomainComparison> {
    match (first, second) {
        (ScoreReport::Rob2(first), ScoreReport::Rob2(second)) => {
            domain_rows(&first.domains, &second.domains)
        }
        (ScoreReport::RobinsI(first), ScoreReport::RobinsI(second)) => {
            domain_rows(&first.domains, &second.domains)
        }
        _ => Vec::new(),
    }
}

fn domain_rows<J: Severity>(
    first: &BTreeMap<String, DomainScore<J>>,
    second: &BTreeMap<String, DomainScore<J>>,
) -> Vec<DomainComparison> {
    first
        .iter()
        .map(|(domain, score)| {
            let mine = score.auto.judgement();
            let theirs = second.get(domain).and_then(|score| score.auto.judgement());
            DomainComparison {
                domain: domain.clone(),
                reviewer1: mine.map(|judgement| judgement.label().to_string()),
                reviewer2: theirs.map(|judgement| judgement.label().to_string()),
                matches: mine == theirs,
            }
        })
        .collect()
}

fn stats(agreements: &[QuestionComparison], disagreements: &[QuestionComparison]) -> ComparisonStats {
    let total = agreements.len() + disagreements.len();
    let critical_disagreements = disagreements.iter().filter(|row| row.critical).count();
    ComparisonStats {
        total,
        agreements: agreements.len(),
        disagreements: disagreements.len(),
        agreement_rate: if total == 0 {
            0.0
        } else {
            agreements.len() as f64 / total as f64
        },
        critical_disagreements,
        non_critical_disagreements: disagreements.len() - critical_disagreements,
    }
}
