use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checklists::domain::{
    Amstar2Form, Checklist, ChecklistBody, ChecklistId, DomainResponse, QuestionResponse,
    StagedAnswer,
};
use crate::checklists::factory::{self, NewChecklist};
use crate::checklists::schema::{amstar, rob2, robins, DomainTemplate};

use super::ReconcileError;

/// Selection key of the preliminary (context) section.
pub const PRELIMINARY: &str = "preliminary";

/// Where the consensus value of one question or section comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum ReconcileChoice {
    #[default]
    Reviewer1,
    Reviewer2,
    Override(QuestionValue),
}

/// Caller-supplied consensus value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionValue {
    Signalling(QuestionResponse),
    Staged(StagedAnswer),
}

/// Metadata of the consensus checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileTarget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Both source checklists plus the per-key selections, as sent over the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReconcileRequest {
    pub reviewer1: Checklist,
    pub reviewer2: Checklist,
    pub target: ReconcileTarget,
    #[serde(default)]
    pub selections: BTreeMap<String, ReconcileChoice>,
}

impl ReconcileRequest {
    pub fn reconcile(&self) -> Result<ReconciledChecklist, ReconcileError> {
        reconcile(&self.reviewer1, &self.reviewer2, &self.target, &self.selections)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Reviewer1,
    Reviewer2,
    Override,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledChecklist {
    pub checklist: Checklist,
    pub source_ids: [ChecklistId; 2],
    /// Origin of every stored question and section of the consensus checklist.
    pub provenance: BTreeMap<String, Provenance>,
    /// Selection keys that matched nothing in the instrument.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_selections: Vec<String>,
}

/// Build the consensus checklist. Every question not named in `selections` is
/// copied from reviewer 1; a consolidated question key (`q9`) selects for all
/// of its parts unless a part is named itself.
pub fn reconcile(
    reviewer1: &Checklist,
    reviewer2: &Checklist,
    target: &ReconcileTarget,
    selections: &BTreeMap<String, ReconcileChoice>,
) -> Result<ReconciledChecklist, ReconcileError> {
    let instrument = reviewer1.instrument();
    if instrument != reviewer2.instrument() {
        return Err(ReconcileError::InstrumentMismatch {
            left: instrument,
            right: reviewer2.instrument(),
        });
    }

    let mut checklist = factory::create(NewChecklist {
        instrument,
        id: target.id.clone(),
        name: target.name.clone(),
        reviewer: target.reviewer.clone(),
        created_at: target.created_at,
    })?;

    let mut merger = Merger {
        selections,
        provenance: BTreeMap::new(),
    };

    checklist.body = match (&reviewer1.body, &reviewer2.body, checklist.body) {
        (ChecklistBody::Rob2(first), ChecklistBody::Rob2(second), ChecklistBody::Rob2(mut form)) => {
            form.preliminary = merger
                .section(PRELIMINARY, &first.preliminary, &second.preliminary)?
                .clone();
            form.domains =
                merger.domains(rob2::DOMAINS, &first.domains, &second.domains)?;
            ChecklistBody::Rob2(form)
        }
        (
            ChecklistBody::RobinsI(first),
            ChecklistBody::RobinsI(second),
            ChecklistBody::RobinsI(mut form),
        ) => {
            form.preliminary = merger
                .section(PRELIMINARY, &first.preliminary, &second.preliminary)?
                .clone();
            for question in robins::TRIAGE {
                let response = merger.response(
                    &[question.key],
                    first.triage.get(question.key),
                    second.triage.get(question.key),
                )?;
                form.triage.insert(question.key.to_string(), response);
            }
            form.domains =
                merger.domains(robins::DOMAINS, &first.domains, &second.domains)?;
            ChecklistBody::RobinsI(form)
        }
        (
            ChecklistBody::Amstar2(first),
            ChecklistBody::Amstar2(second),
            ChecklistBody::Amstar2(form),
        ) => ChecklistBody::Amstar2(merger.staged(first, second, form)?),
        (_, _, body) => body,
    };

    let ignored_selections = unknown_keys(selections, &merger.provenance);
    for key in &ignored_selections {
        tracing::warn!(key = %key, "selection does not name a question or section; ignored");
    }

    let overrides = merger
        .provenance
        .values()
        .filter(|origin| **origin == Provenance::Override)
        .count();
    tracing::info!(
        id = %checklist.id,
        reviewer1 = %reviewer1.id,
        reviewer2 = %reviewer2.id,
        overrides,
        "consensus checklist built"
    );

    Ok(ReconciledChecklist {
        checklist,
        source_ids: [reviewer1.id.clone(), reviewer2.id.clone()],
        provenance: merger.provenance,
        ignored_selections,
    })
}

struct Merger<'a> {
    selections: &'a BTreeMap<String, ReconcileChoice>,
    provenance: BTreeMap<String, Provenance>,
}

impl<'a> Merger<'a> {
    fn choice(&self, keys: &[&str]) -> Option<&'a ReconcileChoice> {
        keys.iter().find_map(|key| self.selections.get(*key))
    }

    /// Pick a whole section from one reviewer. Sections take no overrides.
    fn section<'s, T>(
        &mut self,
        key: &str,
        first: &'s T,
        second: &'s T,
    ) -> Result<&'s T, ReconcileError> {
        let (value, origin) = match self.choice(&[key]) {
            None | Some(ReconcileChoice::Reviewer1) => (first, Provenance::Reviewer1),
            Some(ReconcileChoice::Reviewer2) => (second, Provenance::Reviewer2),
            Some(ReconcileChoice::Override(_)) => {
                return Err(ReconcileError::OverrideKind {
                    key: key.to_string(),
                    expected: "reviewer1 or reviewer2",
                })
            }
        };
        self.provenance.insert(key.to_string(), origin);
        Ok(value)
    }

    /// Pick one signalling answer. `keys` runs from the question itself to the
    /// enclosing section; the first key with a selection decides.
    fn response(
        &mut self,
        keys: &[&str],
        first: Option<&QuestionResponse>,
        second: Option<&QuestionResponse>,
    ) -> Result<QuestionResponse, ReconcileError> {
        let key = keys.first().copied().unwrap_or_default();
        let (value, origin) = match self.choice(keys) {
            None | Some(ReconcileChoice::Reviewer1) => (first.cloned(), Provenance::Reviewer1),
            Some(ReconcileChoice::Reviewer2) => (second.cloned(), Provenance::Reviewer2),
            Some(ReconcileChoice::Override(QuestionValue::Signalling(response))) => {
                (Some(response.clone()), Provenance::Override)
            }
            Some(ReconcileChoice::Override(QuestionValue::Staged(_))) => {
                return Err(ReconcileError::OverrideKind {
                    key: key.to_string(),
                    expected: "a signalling answer",
                })
            }
        };
        self.provenance.insert(key.to_string(), origin);
        Ok(value.unwrap_or_default())
    }

    fn domains<J: Copy>(
        &mut self,
        templates: &'static [DomainTemplate],
        first: &BTreeMap<String, DomainResponse<J>>,
        second: &BTreeMap<String, DomainResponse<J>>,
    ) -> Result<BTreeMap<String, DomainResponse<J>>, ReconcileError> {
        let unanswered = DomainResponse::default();
        let mut merged = BTreeMap::new();

        for template in templates {
            let mine = first.get(template.key).unwrap_or(&unanswered);
            let theirs = second.get(template.key).unwrap_or(&unanswered);

            let reviewer_fields = self.section(template.key, mine, theirs)?;
            let mut domain = DomainResponse {
                judgement: reviewer_fields.judgement,
                direction: reviewer_fields.direction,
                ..DomainResponse::default()
            };

            for question in template.questions {
                let response = self.response(
                    &[question.key, template.key],
                    mine.answers.get(question.key),
                    theirs.answers.get(question.key),
                )?;
                domain.answers.insert(question.key.to_string(), response);
            }
            merged.insert(template.key.to_string(), domain);
        }

        Ok(merged)
    }

    fn staged(
        &mut self,
        first: &Amstar2Form,
        second: &Amstar2Form,
        mut form: Amstar2Form,
    ) -> Result<Amstar2Form, ReconcileError> {
        for scored in amstar::SCORED {
            for part in scored.parts {
                let (value, origin) = match self.choice(&[*part, scored.key]) {
                    None | Some(ReconcileChoice::Reviewer1) => {
                        (first.questions.get(*part).cloned(), Provenance::Reviewer1)
                    }
                    Some(ReconcileChoice::Reviewer2) => {
                        (second.questions.get(*part).cloned(), Provenance::Reviewer2)
                    }
                    Some(ReconcileChoice::Override(QuestionValue::Staged(answer))) => {
                        (Some(answer.clone()), Provenance::Override)
                    }
                    Some(ReconcileChoice::Override(QuestionValue::Signalling(_))) => {
                        return Err(ReconcileError::OverrideKind {
                            key: part.to_string(),
                            expected: "a staged answer",
                        })
                    }
                };
                if let Some(value) = value {
                    form.questions.insert(part.to_string(), value);
                }
                self.provenance.insert(part.to_string(), origin);
                if *part != scored.key {
                    self.provenance.entry(scored.key.to_string()).or_insert(origin);
                }
            }
        }
        Ok(form)
    }
}

fn unknown_keys(
    selections: &BTreeMap<String, ReconcileChoice>,
    provenance: &BTreeMap<String, Provenance>,
) -> Vec<String> {
    let known: BTreeSet<&str> = provenance.keys().map(String::as_str).collect();
    selections
        .keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect()
}
