use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered judgement scale of one instrument; a higher rank is a worse judgement.
pub trait Severity: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    fn rank(self) -> u8;
    fn label(self) -> &'static str;
}

/// Worst judgement of the iterator, keeping the first one seen on ties.
pub fn worst<J: Severity>(judgements: impl IntoIterator<Item = J>) -> Option<J> {
    judgements.into_iter().fold(None, |worst, judgement| match worst {
        Some(current) if current.rank() >= judgement.rank() => Some(current),
        _ => Some(judgement),
    })
}

/// Risk-of-bias scale of the randomized-trial tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rob2Judgement {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Some concerns")]
    SomeConcerns,
    #[serde(rename = "High")]
    High,
}

impl Severity for Rob2Judgement {
    fn rank(self) -> u8 {
        match self {
            Rob2Judgement::Low => 0,
            Rob2Judgement::SomeConcerns => 1,
            Rob2Judgement::High => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Rob2Judgement::Low => "Low",
            Rob2Judgement::SomeConcerns => "Some concerns",
            Rob2Judgement::High => "High",
        }
    }
}

/// Risk-of-bias scale of the non-randomized study tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobinsJudgement {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Low (except for concerns about uncontrolled confounding)")]
    LowExceptConfounding,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Serious")]
    Serious,
    #[serde(rename = "Critical")]
    Critical,
}

impl Severity for RobinsJudgement {
    fn rank(self) -> u8 {
        match self {
            RobinsJudgement::Low => 0,
            RobinsJudgement::LowExceptConfounding => 1,
            RobinsJudgement::Moderate => 2,
            RobinsJudgement::Serious => 3,
            RobinsJudgement::Critical => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RobinsJudgement::Low => "Low",
            RobinsJudgement::LowExceptConfounding => {
                "Low (except for concerns about uncontrolled confounding)"
            }
            RobinsJudgement::Moderate => "Moderate",
            RobinsJudgement::Serious => "Serious",
            RobinsJudgement::Critical => "Critical",
        }
    }
}

/// Overall confidence in the results of a systematic review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceRating {
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Critically Low")]
    CriticallyLow,
}

impl Severity for ConfidenceRating {
    fn rank(self) -> u8 {
        match self {
            ConfidenceRating::High => 0,
            ConfidenceRating::Moderate => 1,
            ConfidenceRating::Low => 2,
            ConfidenceRating::CriticallyLow => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConfidenceRating::High => "High",
            ConfidenceRating::Moderate => "Moderate",
            ConfidenceRating::Low => "Low",
            ConfidenceRating::CriticallyLow => "Critically Low",
        }
    }
}

/// Reviewer-predicted direction of bias for a domain. Recorded, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasDirection {
    FavoursExperimental,
    FavoursComparator,
    TowardsNull,
    AwayFromNull,
    Unpredictable,
}
