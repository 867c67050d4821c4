use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{
    Amstar2Form, Checklist, ChecklistBody, ChecklistId, DomainResponse, Instrument,
    QuestionResponse, Rob2Form, RobinsForm, StagedAnswer,
};
use super::schema::{amstar, rob2, robins, DomainTemplate};

/// Request to create an empty checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChecklist {
    pub instrument: Instrument,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Programmer errors when constructing a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    #[error("checklist id must not be empty")]
    MissingId,
    #[error("checklist name must not be empty")]
    MissingName,
}

/// Build an empty checklist whose every question is present but unanswered.
/// Quality-tool questions carry their critical flag from the instrument.
pub fn create(request: NewChecklist) -> Result<Checklist, ChecklistError> {
    if request.id.trim().is_empty() {
        return Err(ChecklistError::MissingId);
    }
    if request.name.trim().is_empty() {
        return Err(ChecklistError::MissingName);
    }

    let body = match request.instrument {
        Instrument::Rob2 => ChecklistBody::Rob2(Rob2Form {
            domains: empty_domains(rob2::DOMAINS),
            ..Rob2Form::default()
        }),
        Instrument::RobinsI => ChecklistBody::RobinsI(RobinsForm {
            triage: robins::TRIAGE
                .iter()
                .map(|question| (question.key.to_string(), QuestionResponse::default()))
                .collect(),
            domains: empty_domains(robins::DOMAINS),
            ..RobinsForm::default()
        }),
        Instrument::Amstar2 => ChecklistBody::Amstar2(Amstar2Form {
            questions: amstar::QUESTIONS
                .iter()
                .map(|template| {
                    let answer = StagedAnswer {
                        stages: vec![None; template.stage_count()],
                        critical: template.critical,
                        comment: None,
                    };
                    (template.key.to_string(), answer)
                })
                .collect(),
        }),
    };

    tracing::debug!(id = %request.id, instrument = %request.instrument, "checklist created");

    Ok(Checklist {
        id: ChecklistId(request.id),
        name: request.name,
        reviewer: request.reviewer,
        created_at: request.created_at.unwrap_or_else(Utc::now),
        body,
    })
}

fn empty_domains<J>(templates: &'static [DomainTemplate]) -> BTreeMap<String, DomainResponse<J>> {
    templates
        .iter()
        .map(|template| {
            let answers = template
                .questions
                .iter()
                .map(|question| (question.key.to_string(), QuestionResponse::default()))
                .collect();
            let response = DomainResponse {
                answers,
                ..DomainResponse::default()
            };
            (template.key.to_string(), response)
        })
        .collect()
}
