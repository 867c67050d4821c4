use chrono::{TimeZone, Utc};

use crate::checklists::answer::Answer;
use crate::checklists::domain::{
    Checklist, ChecklistBody, DomainResponse, EffectOfInterest, Instrument, QuestionResponse,
};
use crate::checklists::factory::{create, NewChecklist};
use crate::checklists::schema::{amstar, AmstarLabel};

pub(super) fn code(raw: &str) -> Answer {
    raw.parse().expect("known answer code")
}

/// Answers keyed by question, written as answer codes.
pub(super) fn pairs(answers: &[(&'static str, &str)]) -> Vec<(&'static str, Answer)> {
    answers.iter().map(|(key, raw)| (*key, code(raw))).collect()
}

pub(super) fn domain<J>(answers: &[(&'static str, &str)]) -> DomainResponse<J> {
    let mut response = DomainResponse::default();
    for (key, answer) in pairs(answers) {
        response.set_answer(key, answer);
    }
    response
}

pub(super) fn empty_checklist(instrument: Instrument, id: &str) -> Checklist {
    create(NewChecklist {
        instrument,
        id: id.to_string(),
        name: format!("{instrument} appraisal"),
        reviewer: Some(format!("{id}-reviewer")),
        created_at: Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()),
    })
    .expect("valid checklist request")
}

/// Randomized-trial checklist whose five assignment-aim domains all score Low.
pub(super) fn low_risk_rob2(id: &str) -> Checklist {
    let mut checklist = empty_checklist(Instrument::Rob2, id);
    let ChecklistBody::Rob2(form) = &mut checklist.body else {
        unreachable!("factory builds the requested instrument");
    };
    form.preliminary.aim = Some(EffectOfInterest::Assignment);
    form.domains.insert(
        "domain1".into(),
        domain(&[("d1_1", "Y"), ("d1_2", "Y"), ("d1_3", "N")]),
    );
    form.domains
        .insert("domain2a".into(), domain(&[("d2a_1", "N"), ("d2a_2", "N"), ("d2a_6", "Y")]));
    form.domains.insert("domain3".into(), domain(&[("d3_1", "Y")]));
    form.domains.insert(
        "domain4".into(),
        domain(&[("d4_1", "N"), ("d4_2", "N"), ("d4_3", "N")]),
    );
    form.domains.insert(
        "domain5".into(),
        domain(&[("d5_1", "Y"), ("d5_2", "N"), ("d5_3", "N")]),
    );
    checklist
}

/// Non-randomized study checklist with a clean triage and every
/// assignment-aim domain answered favourably.
pub(super) fn favourable_robins(id: &str) -> Checklist {
    let mut checklist = empty_checklist(Instrument::RobinsI, id);
    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!("factory builds the requested instrument");
    };
    form.preliminary.aim = Some(EffectOfInterest::Assignment);
    for (key, raw) in [("b1", "Y"), ("b2", "N"), ("b3", "N")] {
        form.triage
            .insert(key.to_string(), QuestionResponse::answered(code(raw)));
    }
    form.domains.insert(
        "domain1a".into(),
        domain(&[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "N"), ("d1a_4", "N")]),
    );
    form.domains
        .insert("domain2".into(), domain(&[("d2_1", "Y"), ("d2_3", "N")]));
    form.domains
        .insert("domain3".into(), domain(&[("d3_1", "N"), ("d3_4", "Y")]));
    form.domains.insert(
        "domain4".into(),
        domain(&[("d4_1", "Y"), ("d4_2", "Y"), ("d4_3", "Y")]),
    );
    form.domains
        .insert("domain5".into(), domain(&[("d5_1", "N"), ("d5_2", "N")]));
    form.domains.insert(
        "domain6".into(),
        domain(&[("d6_1", "Y"), ("d6_2", "N"), ("d6_3", "N"), ("d6_4", "N")]),
    );
    checklist
}

/// Record `label` as the final-stage pick of a quality-tool question.
pub(super) fn set_label(checklist: &mut Checklist, key: &str, label: AmstarLabel) {
    let template = amstar::question(key).expect("known quality question");
    let index = template
        .labels
        .iter()
        .position(|candidate| *candidate == label)
        .expect("label offered by question");
    let ChecklistBody::Amstar2(form) = &mut checklist.body else {
        panic!("expected a quality-tool checklist");
    };
    form.questions
        .get_mut(key)
        .expect("factory lists every question")
        .select(template.final_stage(), index);
}

/// Quality-tool checklist with every stored question answered Yes.
pub(super) fn all_yes_amstar(id: &str) -> Checklist {
    let mut checklist = empty_checklist(Instrument::Amstar2, id);
    for template in amstar::QUESTIONS {
        set_label(&mut checklist, template.key, AmstarLabel::Yes);
    }
    checklist
}
