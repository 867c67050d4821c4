//! Signalling-question answers and the normalization applied before any
//! decision logic reads them.
//!
//! Every predicate here is total over `Option<Answer>`: an absent answer never
//! matches anything and nothing in this module panics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Categorical answer to a signalling question.
///
/// `WeakNo` and `StrongNo` are only offered by the confounding questions of the
/// non-randomized study tool; the schema lists which options each question takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "PY")]
    ProbablyYes,
    #[serde(rename = "PN")]
    ProbablyNo,
    #[serde(rename = "N")]
    No,
    #[serde(rename = "WN")]
    WeakNo,
    #[serde(rename = "SN")]
    StrongNo,
    #[serde(rename = "NI")]
    NoInformation,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Answer {
    pub const ALL: [Answer; 8] = [
        Answer::Yes,
        Answer::ProbablyYes,
        Answer::ProbablyNo,
        Answer::No,
        Answer::WeakNo,
        Answer::StrongNo,
        Answer::NoInformation,
        Answer::NotApplicable,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Answer::Yes => "Y",
            Answer::ProbablyYes => "PY",
            Answer::ProbablyNo => "PN",
            Answer::No => "N",
            Answer::WeakNo => "WN",
            Answer::StrongNo => "SN",
            Answer::NoInformation => "NI",
            Answer::NotApplicable => "NA",
        }
    }

    /// "Not applicable" is read as "no information" so no branch goes dead.
    pub const fn normalize(self) -> Answer {
        match self {
            Answer::NotApplicable => Answer::NoInformation,
            other => other,
        }
    }

    pub const fn is_affirmative(self) -> bool {
        matches!(self, Answer::Yes | Answer::ProbablyYes)
    }

    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            Answer::No | Answer::ProbablyNo | Answer::WeakNo | Answer::StrongNo
        )
    }

    pub const fn is_no_information(self) -> bool {
        matches!(self.normalize(), Answer::NoInformation)
    }

    pub const fn is_negative_or_no_information(self) -> bool {
        self.is_negative() || self.is_no_information()
    }

    const fn bit(self) -> u8 {
        match self {
            Answer::Yes => 1,
            Answer::ProbablyYes => 1 << 1,
            Answer::ProbablyNo => 1 << 2,
            Answer::No => 1 << 3,
            Answer::WeakNo => 1 << 4,
            Answer::StrongNo => 1 << 5,
            Answer::NoInformation => 1 << 6,
            Answer::NotApplicable => 1 << 7,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised answer code '{0}'")]
pub struct UnknownAnswer(pub String);

impl FromStr for Answer {
    type Err = UnknownAnswer;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim().to_ascii_uppercase();
        Answer::ALL
            .into_iter()
            .find(|answer| answer.code() == code)
            .ok_or_else(|| UnknownAnswer(raw.to_string()))
    }
}

pub fn normalize(answer: Option<Answer>) -> Option<Answer> {
    answer.map(Answer::normalize)
}

pub fn is_affirmative(answer: Option<Answer>) -> bool {
    answer.is_some_and(Answer::is_affirmative)
}

pub fn is_negative(answer: Option<Answer>) -> bool {
    answer.is_some_and(Answer::is_negative)
}

pub fn is_negative_or_no_information(answer: Option<Answer>) -> bool {
    answer.is_some_and(Answer::is_negative_or_no_information)
}

/// Set of answers a decision-tree branch accepts, always stated over
/// normalized answers (so never containing `NA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerSet(u8);

impl AnswerSet {
    pub const EMPTY: AnswerSet = AnswerSet(0);
    pub const YES: AnswerSet = AnswerSet::of(Answer::Yes).with(Answer::ProbablyYes);
    pub const NO: AnswerSet = AnswerSet::of(Answer::No).with(Answer::ProbablyNo);
    pub const NI: AnswerSet = AnswerSet::of(Answer::NoInformation);
    pub const WEAK_NO: AnswerSet = AnswerSet::of(Answer::WeakNo);
    pub const STRONG_NO: AnswerSet = AnswerSet::of(Answer::StrongNo);
    pub const NO_NI: AnswerSet = AnswerSet::NO.union(AnswerSet::NI);
    pub const YES_NI: AnswerSet = AnswerSet::YES.union(AnswerSet::NI);
    pub const YES_WEAK_NO: AnswerSet = AnswerSet::YES.union(AnswerSet::WEAK_NO);
    pub const STRONG_NO_NI: AnswerSet = AnswerSet::STRONG_NO.union(AnswerSet::NI);
    /// `Y/PY/PN/N/NI`, the options of a standard signalling question.
    pub const STANDARD: AnswerSet = AnswerSet::YES.union(AnswerSet::NO_NI);

    pub const fn of(answer: Answer) -> AnswerSet {
        AnswerSet(answer.bit())
    }

    pub const fn with(self, answer: Answer) -> AnswerSet {
        AnswerSet(self.0 | answer.bit())
    }

    pub const fn union(self, other: AnswerSet) -> AnswerSet {
        AnswerSet(self.0 | other.0)
    }

    pub const fn contains(self, answer: Answer) -> bool {
        self.0 & answer.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Answer> {
        Answer::ALL.into_iter().filter(move |answer| self.contains(*answer))
    }
}

/// Deserialize an optional answer code, mapping anything unrecognised to
/// "unanswered" instead of failing the whole document.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse::<Answer>() {
        Ok(answer) => Some(answer),
        Err(err) => {
            if !value.trim().is_empty() {
                tracing::debug!(%err, "treating unrecognised answer as unanswered");
            }
            None
        }
    }))
}
