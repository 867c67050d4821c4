//! Static instrument definitions: domains, question keys and wording, answer
//! options and which questions are critical. Pure data; no scoring logic.

pub mod amstar;
pub mod rob2;
pub mod robins;

use serde::ser::{Serialize, Serializer};

use super::answer::AnswerSet;
use super::domain::{EffectOfInterest, Instrument};

pub use amstar::{AmstarLabel, AmstarQuestionTemplate, StageTemplate};

/// One signalling question of a tree-scored instrument.
#[derive(Debug, serde::Serialize)]
pub struct QuestionTemplate {
    pub key: &'static str,
    pub number: &'static str,
    pub text: &'static str,
    pub options: AnswerSet,
}

/// A scored domain of a tree-scored instrument.
#[derive(Debug, serde::Serialize)]
pub struct DomainTemplate {
    pub key: &'static str,
    pub title: &'static str,
    /// Set when the domain is one of two mutually exclusive variants chosen by
    /// the assessment's aim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<EffectOfInterest>,
    pub questions: &'static [QuestionTemplate],
}

impl DomainTemplate {
    pub fn question(&self, key: &str) -> Option<&'static QuestionTemplate> {
        self.questions.iter().find(|question| question.key == key)
    }

    pub fn applies_to(&self, aim: EffectOfInterest) -> bool {
        self.variant.map_or(true, |variant| variant == aim)
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Keys of the domains that count towards the overall judgement, or `None`
/// while the aim that selects between variants is still unanswered.
pub fn active_domains(
    templates: &'static [DomainTemplate],
    aim: Option<EffectOfInterest>,
) -> Option<Vec<&'static str>> {
    let aim = aim?;
    Some(
        templates
            .iter()
            .filter(|template| template.applies_to(aim))
            .map(|template| template.key)
            .collect(),
    )
}

/// Find the domain holding a question key.
pub fn domain_of(
    templates: &'static [DomainTemplate],
    question: &str,
) -> Option<&'static DomainTemplate> {
    templates
        .iter()
        .find(|template| template.question(question).is_some())
}

/// Serializable description of an instrument for clients building forms.
#[derive(Debug, serde::Serialize)]
pub struct InstrumentSchema {
    pub instrument: Instrument,
    pub title: &'static str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub preliminary: &'static [QuestionTemplate],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub domains: &'static [DomainTemplate],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub questions: &'static [AmstarQuestionTemplate],
}

impl InstrumentSchema {
    pub fn for_instrument(instrument: Instrument) -> Self {
        let (preliminary, domains, questions): (
            &'static [QuestionTemplate],
            &'static [DomainTemplate],
            &'static [AmstarQuestionTemplate],
        ) = match instrument {
            Instrument::Rob2 => (&[], rob2::DOMAINS, &[]),
            Instrument::RobinsI => (robins::TRIAGE, robins::DOMAINS, &[]),
            Instrument::Amstar2 => (&[], &[], amstar::QUESTIONS),
        };

        Self {
            instrument,
            title: instrument.title(),
            preliminary,
            domains,
            questions,
        }
    }
}
