//! Flaw-counting confidence rating of the systematic-review quality tool.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::checklists::domain::{Amstar2Form, Checklist, ChecklistBody, StagedAnswer};
use crate::checklists::judgement::{ConfidenceRating, Severity};
use crate::checklists::schema::amstar::{self, AmstarLabel, AmstarQuestionTemplate, SCORED};

/// Structural problems with a stored staged answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StagedAnswerError {
    #[error("question {0} is not part of the instrument")]
    UnknownQuestion(String),
    #[error("question {0} is missing from the checklist")]
    Missing(String),
    #[error("question {question} records {found} stages but has only {expected}")]
    TooManyStages {
        question: String,
        found: usize,
        expected: usize,
    },
    #[error("question {question} stage {stage} selects option {option} of {available}")]
    OptionOutOfRange {
        question: String,
        stage: usize,
        option: usize,
        available: usize,
    },
}

/// Final label of a staged answer, validated against its template. `Ok(None)`
/// means the final stage has no selection yet.
pub fn final_label(
    template: &AmstarQuestionTemplate,
    answer: &StagedAnswer,
) -> Result<Option<AmstarLabel>, StagedAnswerError> {
    if answer.stages.len() > template.stage_count() {
        return Err(StagedAnswerError::TooManyStages {
            question: template.key.to_string(),
            found: answer.stages.len(),
            expected: template.stage_count(),
        });
    }

    for (stage, selection) in answer.stages.iter().enumerate() {
        let (Some(option), Some(available)) = (*selection, template.option_count(stage)) else {
            continue;
        };
        if option >= available {
            return Err(StagedAnswerError::OptionOutOfRange {
                question: template.key.to_string(),
                stage,
                option,
                available,
            });
        }
    }

    Ok(answer
        .stages
        .get(template.final_stage())
        .copied()
        .flatten()
        .and_then(|option| template.labels.get(option).copied()))
}

/// Read the final label of a stored question from a form.
pub fn read_label(
    form: &Amstar2Form,
    question: &str,
) -> Result<Option<AmstarLabel>, StagedAnswerError> {
    let template = amstar::question(question)
        .ok_or_else(|| StagedAnswerError::UnknownQuestion(question.to_string()))?;
    let answer = form
        .questions
        .get(question)
        .ok_or_else(|| StagedAnswerError::Missing(question.to_string()))?;
    final_label(template, answer)
}

/// Worse of the parts' labels; ties keep the earlier part. Any unanswered part
/// leaves the consolidated question unanswered.
pub fn consolidate(labels: &[Option<AmstarLabel>]) -> Option<AmstarLabel> {
    let mut worst: Option<AmstarLabel> = None;
    for label in labels {
        let label = (*label)?;
        worst = match worst {
            Some(current) if current.rank() >= label.rank() => Some(current),
            _ => Some(label),
        };
    }
    worst
}

/// Map flaw counts to a confidence rating.
pub fn rate(critical_flaws: usize, non_critical_flaws: usize) -> ConfidenceRating {
    match (critical_flaws, non_critical_flaws) {
        (critical, _) if critical > 1 => ConfidenceRating::CriticallyLow,
        (1, _) => ConfidenceRating::Low,
        (_, other) if other > 1 => ConfidenceRating::Moderate,
        _ => ConfidenceRating::High,
    }
}

/// Outcome of the quality tool: a rating, or one of the two sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmstarVerdict {
    Rated(ConfidenceRating),
    /// Well-formed but some scored question has no final selection.
    Incomplete,
    /// Input that is not a well-formed quality-tool checklist.
    Error,
}

impl AmstarVerdict {
    pub fn label(self) -> &'static str {
        match self {
            AmstarVerdict::Rated(rating) => rating.label(),
            AmstarVerdict::Incomplete => "Incomplete",
            AmstarVerdict::Error => "Error",
        }
    }

    pub fn is_rated(self) -> bool {
        matches!(self, AmstarVerdict::Rated(_))
    }

    pub fn rating(self) -> Option<ConfidenceRating> {
        match self {
            AmstarVerdict::Rated(rating) => Some(rating),
            _ => None,
        }
    }
}

impl Serialize for AmstarVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One scored question after consolidation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionScore {
    pub key: &'static str,
    pub label: Option<AmstarLabel>,
    pub critical: bool,
    pub flaw: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmstarScore {
    pub verdict: AmstarVerdict,
    /// Rating implied by the current counts, treating unanswered questions as
    /// flaws. Absent for malformed input.
    pub provisional: Option<ConfidenceRating>,
    pub critical_flaws: usize,
    pub non_critical_flaws: usize,
    pub questions: Vec<QuestionScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AmstarScore {
    fn error(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "quality checklist cannot be scored");
        Self {
            verdict: AmstarVerdict::Error,
            provisional: None,
            critical_flaws: 0,
            non_critical_flaws: 0,
            questions: Vec::new(),
            error: Some(reason),
        }
    }
}

/// Rate a quality-tool checklist. Absent or non-quality-tool checklists and
/// malformed answers produce the `Error` verdict.
pub fn score(checklist: Option<&Checklist>) -> AmstarScore {
    let Some(checklist) = checklist else {
        return AmstarScore::error("no checklist supplied");
    };
    match &checklist.body {
        ChecklistBody::Amstar2(form) => score_form(form),
        other => AmstarScore::error(format!(
            "checklist {} is a {} checklist",
            checklist.id,
            other.instrument()
        )),
    }
}

pub fn score_form(form: &Amstar2Form) -> AmstarScore {
    let mut questions = Vec::with_capacity(SCORED.len());

    for scored in SCORED {
        let mut labels = Vec::with_capacity(scored.parts.len());
        for part in scored.parts {
            match read_label(form, part) {
                Ok(label) => labels.push(label),
                Err(err) => return AmstarScore::error(err.to_string()),
            }
        }

        let label = consolidate(&labels);
        let critical = scored
            .parts
            .iter()
            .filter_map(|part| form.questions.get(*part))
            .any(|answer| answer.critical);
        questions.push(QuestionScore {
            key: scored.key,
            label,
            critical,
            flaw: label.map_or(true, |label| label == AmstarLabel::No),
        });
    }

    let critical_flaws = questions
        .iter()
        .filter(|question| question.flaw && question.critical)
        .count();
    let non_critical_flaws = questions
        .iter()
        .filter(|question| question.flaw && !question.critical)
        .count();
    let provisional = rate(critical_flaws, non_critical_flaws);
    let verdict = if questions.iter().all(|question| question.label.is_some()) {
        AmstarVerdict::Rated(provisional)
    } else {
        AmstarVerdict::Incomplete
    };

    tracing::trace!(
        critical_flaws,
        non_critical_flaws,
        verdict = verdict.label(),
        "quality checklist rated"
    );

    AmstarScore {
        verdict,
        provisional: Some(provisional),
        critical_flaws,
        non_critical_flaws,
        questions,
        error: None,
    }
}
