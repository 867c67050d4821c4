use std::collections::BTreeSet;

use super::common::*;
use crate::checklists::domain::{ChecklistBody, EffectOfInterest, Instrument, QuestionResponse};
use crate::checklists::judgement::RobinsJudgement;
use crate::checklists::scoring::tree::Node;
use crate::checklists::scoring::{robins, score_checklist, ChecklistScore, ScoreReport};

fn robins_score(report: ScoreReport) -> ChecklistScore<RobinsJudgement> {
    match report {
        ScoreReport::RobinsI(score) => score,
        other => panic!("expected a non-randomized study report, got {other:?}"),
    }
}

fn confounding(answers: &[(&'static str, &str)]) -> Option<(RobinsJudgement, String)> {
    let answers = pairs(answers);
    let result = robins::score_domain("domain1a", answers.as_slice());
    result
        .judgement()
        .zip(result.rule_id().map(str::to_string))
}

#[test]
fn affirmative_gate_ends_an_empty_assessment_at_critical() {
    let mut checklist = empty_checklist(Instrument::RobinsI, "nrsi-gate");
    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!();
    };
    form.triage
        .insert("b2".into(), QuestionResponse::answered(code("Y")));

    let score = robins_score(score_checklist(&checklist));
    assert!(score.is_complete);
    assert_eq!(score.overall, Some(RobinsJudgement::Critical));
    let gate = score.gate.expect("gate recorded");
    assert_eq!(gate.rule_id(), Some("TRIAGE.B2"));
    assert!(score
        .domains
        .values()
        .all(|domain| !domain.auto.is_complete()));
}

#[test]
fn gate_overrides_a_favourable_assessment() {
    let mut checklist = favourable_robins("nrsi-a");
    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!();
    };
    form.triage
        .insert("b3".into(), QuestionResponse::answered(code("PY")));

    let score = robins_score(score_checklist(&checklist));
    assert_eq!(score.overall, Some(RobinsJudgement::Critical));
    assert_eq!(
        score.gate.as_ref().and_then(|gate| gate.rule_id()),
        Some("TRIAGE.B3")
    );
}

#[test]
fn only_the_gating_questions_trigger_the_gate() {
    let triage = pairs(&[("b1", "Y"), ("b2", "PN"), ("b3", "NI")]);
    assert!(robins::triage(triage.as_slice()).is_none());

    let triage = pairs(&[("b1", "N"), ("b2", "Y"), ("b3", "Y")]);
    let gate = robins::triage(triage.as_slice()).expect("gate fires");
    assert_eq!(gate.rule_id(), Some("TRIAGE.B2"));
}

#[test]
fn favourable_assessment_is_low_except_for_confounding() {
    let score = robins_score(score_checklist(&favourable_robins("nrsi-a")));
    assert!(score.is_complete);
    assert!(score.gate.is_none());
    assert_eq!(score.overall, Some(RobinsJudgement::LowExceptConfounding));
    assert_eq!(
        score.active_domains,
        vec!["domain1a", "domain2", "domain3", "domain4", "domain5", "domain6"]
    );
    assert_eq!(score.domains["domain6"].auto.rule_id(), Some("D6.R4"));
}

#[test]
fn negative_controls_escalate_the_confounding_level() {
    assert_eq!(
        confounding(&[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "N"), ("d1a_4", "N")]),
        Some((RobinsJudgement::LowExceptConfounding, "D1A.R2".into()))
    );
    assert_eq!(
        confounding(&[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "N"), ("d1a_4", "Y")]),
        Some((RobinsJudgement::Serious, "D1A.R1".into()))
    );
    assert_eq!(
        confounding(&[("d1a_1", "WN"), ("d1a_2", "Y"), ("d1a_3", "PN"), ("d1a_4", "NI")]),
        Some((RobinsJudgement::Moderate, "D1A.R4".into()))
    );
    assert_eq!(
        confounding(&[("d1a_1", "SN"), ("d1a_4", "N")]),
        Some((RobinsJudgement::Serious, "D1A.R6".into()))
    );
    assert_eq!(
        confounding(&[("d1a_1", "SN"), ("d1a_4", "PY")]),
        Some((RobinsJudgement::Critical, "D1A.R5".into()))
    );
}

#[test]
fn confounding_questions_take_graded_no_answers_only() {
    assert_eq!(confounding(&[("d1a_1", "PN"), ("d1a_4", "N")]), None);
}

#[test]
fn unclear_follow_up_start_is_moderate() {
    let answers = pairs(&[("d3_1", "Y"), ("d3_2", "N"), ("d3_4", "NI")]);
    let result = robins::score_domain("domain3", answers.as_slice());
    assert_eq!(result.judgement(), Some(RobinsJudgement::Moderate));
    assert_eq!(result.rule_id(), Some("D3.R2"));
}

#[test]
fn selective_reporting_is_serious_and_unclear_reporting_moderate() {
    let answers = pairs(&[("d6_2", "Y")]);
    let result = robins::score_domain("domain6", answers.as_slice());
    assert_eq!(result.judgement(), Some(RobinsJudgement::Serious));
    assert_eq!(result.rule_id(), Some("D6.R1"));

    let answers = pairs(&[("d6_2", "NI"), ("d6_3", "N"), ("d6_4", "NI")]);
    let result = robins::score_domain("domain6", answers.as_slice());
    assert_eq!(result.judgement(), Some(RobinsJudgement::Moderate));
    assert_eq!(result.rule_id(), Some("D6.R6"));
}

#[test]
fn serious_domain_raises_the_overall() {
    let mut checklist = favourable_robins("nrsi-a");
    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!();
    };
    form.domains
        .insert("domain5".into(), domain(&[("d5_1", "Y")]));

    let score = robins_score(score_checklist(&checklist));
    assert_eq!(score.overall, Some(RobinsJudgement::Serious));
    assert_eq!(score.domains["domain5"].auto.rule_id(), Some("D5.R1"));
}

#[test]
fn adhering_aim_needs_the_time_varying_confounding_domain() {
    let mut checklist = favourable_robins("nrsi-a");
    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!();
    };
    form.preliminary.aim = Some(EffectOfInterest::Adhering);

    let score = robins_score(score_checklist(&checklist));
    assert!(!score.is_complete);
    assert_eq!(score.overall, None);

    let ChecklistBody::RobinsI(form) = &mut checklist.body else {
        unreachable!();
    };
    form.domains.insert(
        "domain1b".into(),
        domain(&[
            ("d1b_1", "Y"),
            ("d1b_2", "Y"),
            ("d1b_3", "Y"),
            ("d1b_4", "Y"),
            ("d1b_5", "N"),
        ]),
    );
    let score = robins_score(score_checklist(&checklist));
    assert_eq!(score.domains["domain1b"].auto.rule_id(), Some("D1B.R2"));
    assert_eq!(score.overall, Some(RobinsJudgement::LowExceptConfounding));
}

#[test]
fn rule_ids_are_unique_per_domain_table() {
    for (domain, trees) in robins::TREES {
        let rules: Vec<&str> = trees.iter().flat_map(|tree| tree.rules()).collect();
        assert!(!rules.is_empty(), "{domain} has no leaves");
        let prefix = rules[0].split('.').next().unwrap_or_default();
        assert!(rules.iter().all(|rule| rule.starts_with(prefix)));
    }
}

#[test]
fn every_leaf_is_reached_by_its_answers() {
    type Case = (
        &'static Node<RobinsJudgement>,
        &'static [(&'static str, &'static str)],
        RobinsJudgement,
        &'static str,
    );
    use RobinsJudgement::{Critical, Low, LowExceptConfounding, Moderate, Serious};

    let cases: &[Case] = &[
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "N"), ("d1a_4", "Y")], Serious, "D1A.R1"),
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "Y"), ("d1a_2", "PY"), ("d1a_3", "PN"), ("d1a_4", "NI")], LowExceptConfounding, "D1A.R2"),
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "NI"), ("d1a_4", "Y")], Serious, "D1A.R3"),
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "WN"), ("d1a_2", "Y"), ("d1a_3", "N"), ("d1a_4", "N")], Moderate, "D1A.R4"),
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "SN"), ("d1a_4", "Y")], Critical, "D1A.R5"),
        (&robins::CONFOUNDING_ASSIGNMENT, &[("d1a_1", "Y"), ("d1a_2", "Y"), ("d1a_3", "Y"), ("d1a_4", "N")], Serious, "D1A.R6"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "Y"), ("d1b_2", "Y"), ("d1b_3", "Y"), ("d1b_4", "Y"), ("d1b_5", "Y")], Serious, "D1B.R1"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "Y"), ("d1b_2", "Y"), ("d1b_3", "Y"), ("d1b_4", "Y"), ("d1b_5", "N")], LowExceptConfounding, "D1B.R2"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "WN"), ("d1b_2", "Y"), ("d1b_3", "Y"), ("d1b_4", "Y"), ("d1b_5", "Y")], Serious, "D1B.R3"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "Y"), ("d1b_2", "Y"), ("d1b_3", "WN"), ("d1b_4", "WN"), ("d1b_5", "NI")], Moderate, "D1B.R4"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "SN"), ("d1b_5", "Y")], Critical, "D1B.R5"),
        (&robins::CONFOUNDING_ADHERING, &[("d1b_1", "Y"), ("d1b_2", "NI"), ("d1b_5", "N")], Serious, "D1B.R6"),
        (&robins::CLASSIFICATION, &[("d2_1", "N"), ("d2_2", "Y")], Serious, "D2.R1"),
        (&robins::CLASSIFICATION, &[("d2_1", "Y"), ("d2_3", "N")], Low, "D2.R2"),
        (&robins::CLASSIFICATION, &[("d2_1", "Y"), ("d2_3", "NI")], Moderate, "D2.R3"),
        (&robins::CLASSIFICATION, &[("d2_1", "NI"), ("d2_2", "N"), ("d2_3", "Y"), ("d2_4", "N")], Moderate, "D2.R4"),
        (&robins::CLASSIFICATION, &[("d2_1", "Y"), ("d2_3", "Y"), ("d2_4", "NI")], Serious, "D2.R5"),
        (&robins::CLASSIFICATION, &[("d2_1", "N"), ("d2_2", "NI"), ("d2_3", "N")], Moderate, "D2.R6"),
        (&robins::CLASSIFICATION, &[("d2_1", "N"), ("d2_2", "NI"), ("d2_3", "Y"), ("d2_4", "N")], Moderate, "D2.R7"),
        (&robins::CLASSIFICATION, &[("d2_1", "N"), ("d2_2", "NI"), ("d2_3", "Y"), ("d2_4", "Y")], Serious, "D2.R8"),
        (&robins::SELECTION, &[("d3_1", "N"), ("d3_4", "Y")], Low, "D3.R1"),
        (&robins::SELECTION, &[("d3_1", "Y"), ("d3_2", "N"), ("d3_4", "NI")], Moderate, "D3.R2"),
        (&robins::SELECTION, &[("d3_1", "N"), ("d3_4", "N"), ("d3_5", "Y")], Moderate, "D3.R3"),
        (&robins::SELECTION, &[("d3_1", "Y"), ("d3_2", "Y"), ("d3_3", "Y"), ("d3_5", "N")], Serious, "D3.R4"),
        (&robins::SELECTION, &[("d3_1", "NI"), ("d3_4", "Y")], Moderate, "D3.R5"),
        (&robins::MISSING_DATA, &[("d4_1", "Y"), ("d4_2", "Y"), ("d4_3", "Y")], Low, "D4.R1"),
        (&robins::MISSING_DATA, &[("d4_1", "N"), ("d4_4", "Y")], Low, "D4.R2"),
        (&robins::MISSING_DATA, &[("d4_1", "Y"), ("d4_2", "N"), ("d4_4", "NI"), ("d4_5", "N")], Moderate, "D4.R3"),
        (&robins::MISSING_DATA, &[("d4_1", "Y"), ("d4_2", "Y"), ("d4_3", "N"), ("d4_4", "N"), ("d4_5", "Y")], Serious, "D4.R4"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "Y")], Serious, "D5.R1"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "N"), ("d5_2", "N")], Low, "D5.R2"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "N"), ("d5_2", "Y"), ("d5_3", "N")], Low, "D5.R3"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "N"), ("d5_2", "NI"), ("d5_3", "NI")], Moderate, "D5.R4"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "N"), ("d5_2", "Y"), ("d5_3", "Y")], Serious, "D5.R5"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "NI"), ("d5_2", "N")], Moderate, "D5.R6"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "NI"), ("d5_2", "Y"), ("d5_3", "NI")], Moderate, "D5.R7"),
        (&robins::OUTCOME_MEASUREMENT, &[("d5_1", "NI"), ("d5_2", "NI"), ("d5_3", "Y")], Serious, "D5.R8"),
        (&robins::REPORTED_RESULT, &[("d6_2", "Y")], Serious, "D6.R1"),
        (&robins::REPORTED_RESULT, &[("d6_2", "N"), ("d6_3", "Y")], Serious, "D6.R2"),
        (&robins::REPORTED_RESULT, &[("d6_2", "NI"), ("d6_3", "N"), ("d6_4", "Y")], Serious, "D6.R3"),
        (&robins::REPORTED_RESULT, &[("d6_2", "N"), ("d6_3", "N"), ("d6_4", "N"), ("d6_1", "Y")], Low, "D6.R4"),
        (&robins::REPORTED_RESULT, &[("d6_2", "N"), ("d6_3", "N"), ("d6_4", "N"), ("d6_1", "NI")], Moderate, "D6.R5"),
        (&robins::REPORTED_RESULT, &[("d6_2", "N"), ("d6_3", "NI"), ("d6_4", "N")], Moderate, "D6.R6"),
    ];

    for (tree, answers, judgement, rule) in cases {
        let answers = pairs(answers);
        let result = tree.evaluate(answers.as_slice());
        assert_eq!(result.judgement(), Some(*judgement), "{rule}");
        assert_eq!(result.rule_id(), Some(*rule));
    }

    let tested: BTreeSet<&str> = cases.iter().map(|(_, _, _, rule)| *rule).collect();
    let defined: BTreeSet<&str> = robins::TREES
        .iter()
        .flat_map(|(_, trees)| trees.iter().flat_map(|tree| tree.rules()))
        .collect();
    assert_eq!(tested, defined);
}
