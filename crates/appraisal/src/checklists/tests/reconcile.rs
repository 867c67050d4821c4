use std::collections::BTreeMap;

use super::common::*;
use crate::checklists::domain::{ChecklistBody, QuestionResponse, StagedAnswer};
use crate::checklists::reconcile::{
    compare, compare_json, reconcile, Provenance, QuestionValue, ReconcileChoice, ReconcileError,
    ReconcileTarget,
};
use crate::checklists::schema::AmstarLabel;
use crate::checklists::scoring::amstar::read_label;

fn target(id: &str) -> ReconcileTarget {
    ReconcileTarget {
        id: id.to_string(),
        name: "Consensus".to_string(),
        reviewer: None,
        created_at: None,
    }
}

fn selections(entries: Vec<(&str, ReconcileChoice)>) -> BTreeMap<String, ReconcileChoice> {
    entries
        .into_iter()
        .map(|(key, choice)| (key.to_string(), choice))
        .collect()
}

#[test]
fn identical_checklists_fully_agree() {
    let first = low_risk_rob2("rob2-a");
    let second = low_risk_rob2("rob2-b");
    let comparison = compare(&first, &second).expect("same instrument");
    assert_eq!(comparison.stats.disagreements, 0);
    assert_eq!(comparison.stats.agreements, comparison.stats.total);
    assert!((comparison.stats.agreement_rate - 1.0).abs() < f64::EPSILON);
    assert!(comparison.domains.iter().all(|row| row.matches));
}

#[test]
fn normalized_answers_agree_but_differ_in_detail() {
    let mut first = low_risk_rob2("rob2-a");
    let mut second = low_risk_rob2("rob2-b");
    let ChecklistBody::Rob2(form) = &mut second.body else {
        unreachable!();
    };
    form.domains
        .get_mut("domain2b")
        .expect("domain2b present")
        .set_answer("d2b_1", code("NA"));
    form.domains
        .get_mut("domain1")
        .expect("domain1 present")
        .set_answer("d1_3", code("PY"));

    let ChecklistBody::Rob2(form) = &mut first.body else {
        unreachable!();
    };
    form.domains
        .get_mut("domain2b")
        .expect("domain2b present")
        .set_answer("d2b_1", code("NI"));

    let comparison = compare(&first, &second).expect("same instrument");
    let na_row = comparison
        .agreements
        .iter()
        .find(|row| row.key == "d2b_1")
        .expect("NA and NI agree");
    assert!(!na_row.detailed_match);

    assert_eq!(comparison.stats.disagreements, 1);
    let row = &comparison.disagreements[0];
    assert_eq!(row.key, "d1_3");
    assert_eq!(row.domain.as_deref(), Some("domain1"));
    assert_eq!(row.reviewer1.as_deref(), Some("N"));
    assert_eq!(row.reviewer2.as_deref(), Some("PY"));
    assert_eq!(comparison.stats.non_critical_disagreements, 1);

    let domain1 = comparison
        .domains
        .iter()
        .find(|row| row.domain == "domain1")
        .expect("domain row");
    assert!(!domain1.matches);
    assert_eq!(domain1.reviewer2.as_deref(), Some("Some concerns"));
}

#[test]
fn quality_comparison_counts_critical_disagreements() {
    let first = all_yes_amstar("sr-a");
    let mut second = all_yes_amstar("sr-b");
    set_label(&mut second, "q4", AmstarLabel::PartialYes);
    set_label(&mut second, "q10", AmstarLabel::No);

    let comparison = compare(&first, &second).expect("same instrument");
    assert_eq!(comparison.stats.total, 18);
    assert_eq!(comparison.stats.disagreements, 2);
    assert_eq!(comparison.stats.critical_disagreements, 1);
    assert_eq!(comparison.stats.non_critical_disagreements, 1);
    assert!(comparison.domains.is_empty());
}

#[test]
fn differing_critical_flags_are_a_disagreement() {
    let first = all_yes_amstar("sr-a");
    let mut second = all_yes_amstar("sr-b");
    let ChecklistBody::Amstar2(form) = &mut second.body else {
        unreachable!();
    };
    form.questions.get_mut("q5").expect("q5 present").critical = true;

    let comparison = compare(&first, &second).expect("same instrument");
    let row = &comparison.disagreements[0];
    assert_eq!(row.key, "q5");
    assert!(row.final_match);
    assert!(!row.critical_match);
    assert!(row.critical);
}

#[test]
fn mixed_instruments_cannot_be_compared() {
    let error = compare(&low_risk_rob2("rob2-a"), &all_yes_amstar("sr-a"))
        .expect_err("instrument mismatch");
    assert!(matches!(error, ReconcileError::InstrumentMismatch { .. }));
}

#[test]
fn undecodable_document_names_the_reviewer() {
    let valid = serde_json::to_value(low_risk_rob2("rob2-a")).expect("serializes");
    let error = compare_json(&valid, &serde_json::json!({ "id": 4 })).expect_err("invalid");
    assert!(matches!(
        error,
        ReconcileError::InvalidSource { ref checklist, .. } if checklist == "reviewer2"
    ));
}

#[test]
fn unselected_questions_come_from_reviewer_one() {
    let first = low_risk_rob2("rob2-a");
    let second = empty_checklist(crate::checklists::Instrument::Rob2, "rob2-b");
    let reconciled =
        reconcile(&first, &second, &target("rob2-c"), &BTreeMap::new()).expect("reconciles");

    assert_eq!(reconciled.checklist.id.0, "rob2-c");
    assert_eq!(reconciled.source_ids[0].0, "rob2-a");
    assert!(reconciled
        .provenance
        .values()
        .all(|origin| *origin == Provenance::Reviewer1));
    assert_eq!(
        crate::checklists::score_checklist(&reconciled.checklist),
        crate::checklists::score_checklist(&first)
    );
}

#[test]
fn selections_pick_reviewer_two_or_an_override() {
    let first = low_risk_rob2("rob2-a");
    let mut second = low_risk_rob2("rob2-b");
    let ChecklistBody::Rob2(form) = &mut second.body else {
        unreachable!();
    };
    form.domains
        .get_mut("domain1")
        .expect("domain1 present")
        .set_answer("d1_3", code("Y"));

    let override_value = QuestionResponse {
        answer: Some(code("NI")),
        comment: Some("agreed at consensus meeting".into()),
    };
    let choices = selections(vec![
        ("d1_3", ReconcileChoice::Reviewer2),
        (
            "d3_1",
            ReconcileChoice::Override(QuestionValue::Signalling(override_value.clone())),
        ),
    ]);
    let reconciled = reconcile(&first, &second, &target("rob2-c"), &choices).expect("reconciles");

    let ChecklistBody::Rob2(form) = &reconciled.checklist.body else {
        panic!("expected a randomized-trial checklist");
    };
    assert_eq!(form.domains["domain1"].answer("d1_3"), Some(code("Y")));
    assert_eq!(form.domains["domain3"].answers["d3_1"], override_value);
    assert_eq!(reconciled.provenance["d1_3"], Provenance::Reviewer2);
    assert_eq!(reconciled.provenance["d3_1"], Provenance::Override);
    assert_eq!(reconciled.provenance["d1_1"], Provenance::Reviewer1);
}

#[test]
fn section_keys_select_preliminary_and_domain_fields() {
    let first = low_risk_rob2("rob2-a");
    let mut second = low_risk_rob2("rob2-b");
    let ChecklistBody::Rob2(form) = &mut second.body else {
        unreachable!();
    };
    form.preliminary.aim = None;
    form.domains.get_mut("domain4").expect("domain4 present").judgement =
        Some(crate::checklists::Rob2Judgement::High);

    let choices = selections(vec![
        ("preliminary", ReconcileChoice::Reviewer2),
        ("domain4", ReconcileChoice::Reviewer2),
    ]);
    let reconciled = reconcile(&first, &second, &target("rob2-c"), &choices).expect("reconciles");
    let ChecklistBody::Rob2(form) = &reconciled.checklist.body else {
        unreachable!();
    };
    assert_eq!(form.preliminary.aim, None);
    assert_eq!(
        form.domains["domain4"].judgement,
        Some(crate::checklists::Rob2Judgement::High)
    );

    let choices = selections(vec![(
        "preliminary",
        ReconcileChoice::Override(QuestionValue::Signalling(QuestionResponse::default())),
    )]);
    let error = reconcile(&first, &second, &target("rob2-c"), &choices).expect_err("no override");
    assert!(matches!(error, ReconcileError::OverrideKind { .. }));
}

#[test]
fn domain_key_carries_its_answers_unless_a_question_is_named() {
    let first = low_risk_rob2("rob2-a");
    let mut second = low_risk_rob2("rob2-b");
    let ChecklistBody::Rob2(form) = &mut second.body else {
        unreachable!();
    };
    let domain1 = form.domains.get_mut("domain1").expect("domain1 present");
    domain1.set_answer("d1_2", code("N"));
    domain1.set_answer("d1_3", code("Y"));

    let choices = selections(vec![
        ("domain1", ReconcileChoice::Reviewer2),
        ("d1_3", ReconcileChoice::Reviewer1),
    ]);
    let reconciled = reconcile(&first, &second, &target("rob2-c"), &choices).expect("reconciles");
    let ChecklistBody::Rob2(form) = &reconciled.checklist.body else {
        unreachable!();
    };
    assert_eq!(form.domains["domain1"].answer("d1_2"), Some(code("N")));
    assert_eq!(form.domains["domain1"].answer("d1_3"), Some(code("N")));
    assert_eq!(reconciled.provenance["domain1"], Provenance::Reviewer2);
    assert_eq!(reconciled.provenance["d1_2"], Provenance::Reviewer2);
    assert_eq!(reconciled.provenance["d1_1"], Provenance::Reviewer2);
    assert_eq!(reconciled.provenance["d1_3"], Provenance::Reviewer1);
    assert_eq!(reconciled.provenance["d2a_1"], Provenance::Reviewer1);
}

#[test]
fn consolidated_key_selects_both_parts() {
    let first = all_yes_amstar("sr-a");
    let mut second = all_yes_amstar("sr-b");
    set_label(&mut second, "q9a", AmstarLabel::PartialYes);
    set_label(&mut second, "q9b", AmstarLabel::No);

    let choices = selections(vec![("q9", ReconcileChoice::Reviewer2)]);
    let reconciled = reconcile(&first, &second, &target("sr-c"), &choices).expect("reconciles");
    let ChecklistBody::Amstar2(form) = &reconciled.checklist.body else {
        unreachable!();
    };
    assert_eq!(read_label(form, "q9a"), Ok(Some(AmstarLabel::PartialYes)));
    assert_eq!(read_label(form, "q9b"), Ok(Some(AmstarLabel::No)));
    assert_eq!(reconciled.provenance["q9"], Provenance::Reviewer2);
    assert!(reconciled.ignored_selections.is_empty());
}

#[test]
fn part_selection_beats_the_consolidated_key() {
    let first = all_yes_amstar("sr-a");
    let mut second = all_yes_amstar("sr-b");
    set_label(&mut second, "q11a", AmstarLabel::No);
    set_label(&mut second, "q11b", AmstarLabel::No);

    let mut staged = StagedAnswer {
        critical: true,
        ..StagedAnswer::default()
    };
    staged.select(1, 2);
    let choices = selections(vec![
        ("q11", ReconcileChoice::Reviewer2),
        (
            "q11b",
            ReconcileChoice::Override(QuestionValue::Staged(staged)),
        ),
    ]);
    let reconciled = reconcile(&first, &second, &target("sr-c"), &choices).expect("reconciles");
    let ChecklistBody::Amstar2(form) = &reconciled.checklist.body else {
        unreachable!();
    };
    assert_eq!(read_label(form, "q11a"), Ok(Some(AmstarLabel::No)));
    assert_eq!(reconciled.provenance["q11b"], Provenance::Override);
}

#[test]
fn staged_question_rejects_a_signalling_override() {
    let first = all_yes_amstar("sr-a");
    let second = all_yes_amstar("sr-b");
    let choices = selections(vec![(
        "q1",
        ReconcileChoice::Override(QuestionValue::Signalling(QuestionResponse::default())),
    )]);
    let error = reconcile(&first, &second, &target("sr-c"), &choices).expect_err("wrong kind");
    assert_eq!(
        error,
        ReconcileError::OverrideKind {
            key: "q1".into(),
            expected: "a staged answer",
        }
    );
}

#[test]
fn unknown_selection_keys_are_reported() {
    let first = favourable_robins("nrsi-a");
    let second = favourable_robins("nrsi-b");
    let choices = selections(vec![
        ("b2", ReconcileChoice::Reviewer2),
        ("d9_9", ReconcileChoice::Reviewer2),
    ]);
    let reconciled = reconcile(&first, &second, &target("nrsi-c"), &choices).expect("reconciles");
    assert_eq!(reconciled.ignored_selections, vec!["d9_9".to_string()]);
    assert_eq!(reconciled.provenance["b2"], Provenance::Reviewer2);
}

#[test]
fn reconciliation_requires_matching_instruments_and_a_target_id() {
    let error = reconcile(
        &low_risk_rob2("rob2-a"),
        &favourable_robins("nrsi-a"),
        &target("x"),
        &BTreeMap::new(),
    )
    .expect_err("mismatch");
    assert!(matches!(error, ReconcileError::InstrumentMismatch { .. }));

    let error = reconcile(
        &low_risk_rob2("rob2-a"),
        &low_risk_rob2("rob2-b"),
        &target(" "),
        &BTreeMap::new(),
    )
    .expect_err("blank id");
    assert!(matches!(error, ReconcileError::Checklist(_)));
}
