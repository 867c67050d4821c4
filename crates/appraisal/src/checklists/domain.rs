use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answer::{self, Answer};
use super::judgement::{BiasDirection, Rob2Judgement, RobinsJudgement};

/// Identifier wrapper for checklist documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistId(pub String);

impl fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The appraisal instruments this crate knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    #[serde(rename = "ROB2")]
    Rob2,
    #[serde(rename = "ROBINS_I")]
    RobinsI,
    #[serde(rename = "AMSTAR2")]
    Amstar2,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [Instrument::Rob2, Instrument::RobinsI, Instrument::Amstar2];

    pub const fn code(self) -> &'static str {
        match self {
            Instrument::Rob2 => "ROB2",
            Instrument::RobinsI => "ROBINS_I",
            Instrument::Amstar2 => "AMSTAR2",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Instrument::Rob2 => "RoB 2: risk of bias in randomized trials",
            Instrument::RobinsI => "ROBINS-I V2: risk of bias in non-randomized studies of interventions",
            Instrument::Amstar2 => "AMSTAR 2: quality of systematic reviews",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "ROB2" => Ok(Instrument::Rob2),
            "ROBINSI" | "ROBINS" => Ok(Instrument::RobinsI),
            "AMSTAR2" | "AMSTAR" => Ok(Instrument::Amstar2),
            _ => Err(format!(
                "unknown instrument '{raw}' (expected ROB2, ROBINS_I or AMSTAR2)"
            )),
        }
    }
}

/// Aggregate root: metadata plus the instrument-specific answer form.
///
/// Judgements are never stored here; scoring re-derives them from the answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub body: ChecklistBody,
}

impl Checklist {
    pub fn instrument(&self) -> Instrument {
        self.body.instrument()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "instrument", content = "form")]
pub enum ChecklistBody {
    #[serde(rename = "ROB2")]
    Rob2(Rob2Form),
    #[serde(rename = "ROBINS_I")]
    RobinsI(RobinsForm),
    #[serde(rename = "AMSTAR2")]
    Amstar2(Amstar2Form),
}

impl ChecklistBody {
    pub fn instrument(&self) -> Instrument {
        match self {
            ChecklistBody::Rob2(_) => Instrument::Rob2,
            ChecklistBody::RobinsI(_) => Instrument::RobinsI,
            ChecklistBody::Amstar2(_) => Instrument::Amstar2,
        }
    }
}

/// Which effect the assessment targets; selects between domain variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectOfInterest {
    /// Effect of assignment to intervention (intention-to-treat).
    Assignment,
    /// Effect of starting and adhering to intervention (per-protocol).
    Adhering,
}

/// One signalling question's answer and the reviewer's supporting note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    #[serde(default, deserialize_with = "answer::deserialize_lenient")]
    pub answer: Option<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl QuestionResponse {
    pub fn answered(answer: Answer) -> Self {
        Self {
            answer: Some(answer),
            comment: None,
        }
    }
}

/// Answers of a single domain plus the optional reviewer-set fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "J: Deserialize<'de>"))]
pub struct DomainResponse<J> {
    #[serde(default)]
    pub answers: BTreeMap<String, QuestionResponse>,
    /// Reviewer override of the automatic judgement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgement: Option<J>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<BiasDirection>,
}

impl<J> Default for DomainResponse<J> {
    fn default() -> Self {
        Self {
            answers: BTreeMap::new(),
            judgement: None,
            direction: None,
        }
    }
}

impl<J> DomainResponse<J> {
    pub fn answer(&self, question: &str) -> Option<Answer> {
        self.answers
            .get(question)
            .and_then(|response| response.answer)
    }

    pub fn set_answer(&mut self, question: &str, answer: Answer) {
        self.answers
            .entry(question.to_string())
            .or_default()
            .answer = Some(answer);
    }
}

/// Read access to answers by question key, as consumed by the decision trees.
pub trait AnswerLookup {
    fn answer(&self, question: &str) -> Option<Answer>;
}

impl<J> AnswerLookup for DomainResponse<J> {
    fn answer(&self, question: &str) -> Option<Answer> {
        DomainResponse::answer(self, question)
    }
}

impl AnswerLookup for BTreeMap<String, QuestionResponse> {
    fn answer(&self, question: &str) -> Option<Answer> {
        self.get(question).and_then(|response| response.answer)
    }
}

impl AnswerLookup for [(&str, Answer)] {
    fn answer(&self, question: &str) -> Option<Answer> {
        self.iter()
            .find(|(key, _)| *key == question)
            .map(|(_, answer)| *answer)
    }
}

/// Preliminary considerations of a randomized-trial assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rob2Preliminary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerical_result: Option<String>,
    #[serde(default)]
    pub aim: Option<EffectOfInterest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rob2Form {
    #[serde(default)]
    pub preliminary: Rob2Preliminary,
    #[serde(default)]
    pub domains: BTreeMap<String, DomainResponse<Rob2Judgement>>,
}

/// Preliminary considerations of a non-randomized study assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobinsPreliminary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerical_result: Option<String>,
    #[serde(default)]
    pub aim: Option<EffectOfInterest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobinsForm {
    #[serde(default)]
    pub preliminary: RobinsPreliminary,
    /// Questions deciding whether a full assessment is warranted at all.
    #[serde(default)]
    pub triage: BTreeMap<String, QuestionResponse>,
    #[serde(default)]
    pub domains: BTreeMap<String, DomainResponse<RobinsJudgement>>,
}

/// A quality-tool answer recorded as ordered refinement stages.
///
/// Each stage holds the index of the single option picked in that stage; the
/// last stage's pick is the scored label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAnswer {
    #[serde(default)]
    pub stages: Vec<Option<usize>>,
    #[serde(default)]
    pub critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StagedAnswer {
    pub fn select(&mut self, stage: usize, option: usize) {
        if self.stages.len() <= stage {
            self.stages.resize(stage + 1, None);
        }
        self.stages[stage] = Some(option);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amstar2Form {
    #[serde(default)]
    pub questions: BTreeMap<String, StagedAnswer>,
}
