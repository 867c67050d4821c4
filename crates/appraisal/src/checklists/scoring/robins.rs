//! Decision tables and triage gate of the non-randomized study tool.
//!
//! The confounding domains carry a concern level (low, moderate, serious)
//! through the tree. Each level has its own copy of the remaining nodes so the
//! interpreter stays a plain table walk.

use crate::checklists::answer::{self, AnswerSet};
use crate::checklists::domain::{AnswerLookup, DomainResponse, RobinsForm};
use crate::checklists::judgement::RobinsJudgement;
use crate::checklists::schema::robins::{
    DOMAIN1A, DOMAIN1B, DOMAIN2, DOMAIN3, DOMAIN4, DOMAIN5, DOMAIN6, DOMAINS, GATING_QUESTIONS,
};

use super::tree::{ask, leaf, score_parts, DomainTrees, Node};
use super::{ChecklistScore, DomainScore, ScoringResult};

const LOW: RobinsJudgement = RobinsJudgement::Low;
const LOW_EXCEPT: RobinsJudgement = RobinsJudgement::LowExceptConfounding;
const MODERATE: RobinsJudgement = RobinsJudgement::Moderate;
const SERIOUS: RobinsJudgement = RobinsJudgement::Serious;
const CRITICAL: RobinsJudgement = RobinsJudgement::Critical;

const YES: AnswerSet = AnswerSet::YES;
const NO: AnswerSet = AnswerSet::NO;
const NI: AnswerSet = AnswerSet::NI;
const WEAK_NO: AnswerSet = AnswerSet::WEAK_NO;
const YES_NI: AnswerSet = AnswerSet::YES_NI;
const NO_NI: AnswerSet = AnswerSet::NO_NI;
const YES_WEAK_NO: AnswerSet = AnswerSet::YES_WEAK_NO;
const STRONG_NO_NI: AnswerSet = AnswerSet::STRONG_NO_NI;

// Domain 1, effect of assignment. 1.4 (negative controls) escalates the level
// reached by 1.1 to 1.3.

static D1A_NEGATIVE_CONTROLS_LOW: Node<RobinsJudgement> = Node {
    question: "d1a_4",
    branches: &[leaf(YES, SERIOUS, "D1A.R1"), leaf(NO_NI, LOW_EXCEPT, "D1A.R2")],
};

static D1A_NEGATIVE_CONTROLS_MODERATE: Node<RobinsJudgement> = Node {
    question: "d1a_4",
    branches: &[leaf(YES, SERIOUS, "D1A.R3"), leaf(NO_NI, MODERATE, "D1A.R4")],
};

static D1A_NEGATIVE_CONTROLS_SERIOUS: Node<RobinsJudgement> = Node {
    question: "d1a_4",
    branches: &[leaf(YES, CRITICAL, "D1A.R5"), leaf(NO_NI, SERIOUS, "D1A.R6")],
};

static D1A_POST_INTERVENTION_LOW: Node<RobinsJudgement> = Node {
    question: "d1a_3",
    branches: &[
        ask(NO, &D1A_NEGATIVE_CONTROLS_LOW),
        ask(NI, &D1A_NEGATIVE_CONTROLS_MODERATE),
        ask(YES, &D1A_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1A_POST_INTERVENTION_MODERATE: Node<RobinsJudgement> = Node {
    question: "d1a_3",
    branches: &[
        ask(NO_NI, &D1A_NEGATIVE_CONTROLS_MODERATE),
        ask(YES, &D1A_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1A_MEASURED_VALIDLY: Node<RobinsJudgement> = Node {
    question: "d1a_2",
    branches: &[
        ask(YES, &D1A_POST_INTERVENTION_LOW),
        ask(WEAK_NO, &D1A_POST_INTERVENTION_MODERATE),
        ask(STRONG_NO_NI, &D1A_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1A_MEASURED_VALIDLY_WEAK: Node<RobinsJudgement> = Node {
    question: "d1a_2",
    branches: &[
        ask(YES_WEAK_NO, &D1A_POST_INTERVENTION_MODERATE),
        ask(STRONG_NO_NI, &D1A_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

pub static CONFOUNDING_ASSIGNMENT: Node<RobinsJudgement> = Node {
    question: "d1a_1",
    branches: &[
        ask(YES, &D1A_MEASURED_VALIDLY),
        ask(WEAK_NO, &D1A_MEASURED_VALIDLY_WEAK),
        ask(STRONG_NO_NI, &D1A_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

// Domain 1, effect of adhering. Baseline (1.1, 1.2) then time-varying (1.3,
// 1.4) confounding, escalated by 1.5.

static D1B_NEGATIVE_CONTROLS_LOW: Node<RobinsJudgement> = Node {
    question: "d1b_5",
    branches: &[leaf(YES, SERIOUS, "D1B.R1"), leaf(NO_NI, LOW_EXCEPT, "D1B.R2")],
};

static D1B_NEGATIVE_CONTROLS_MODERATE: Node<RobinsJudgement> = Node {
    question: "d1b_5",
    branches: &[leaf(YES, SERIOUS, "D1B.R3"), leaf(NO_NI, MODERATE, "D1B.R4")],
};

static D1B_NEGATIVE_CONTROLS_SERIOUS: Node<RobinsJudgement> = Node {
    question: "d1b_5",
    branches: &[leaf(YES, CRITICAL, "D1B.R5"), leaf(NO_NI, SERIOUS, "D1B.R6")],
};

static D1B_TIME_VARYING_VALID_LOW: Node<RobinsJudgement> = Node {
    question: "d1b_4",
    branches: &[
        ask(YES, &D1B_NEGATIVE_CONTROLS_LOW),
        ask(WEAK_NO, &D1B_NEGATIVE_CONTROLS_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1B_TIME_VARYING_VALID_MODERATE: Node<RobinsJudgement> = Node {
    question: "d1b_4",
    branches: &[
        ask(YES_WEAK_NO, &D1B_NEGATIVE_CONTROLS_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1B_TIME_VARYING_LOW: Node<RobinsJudgement> = Node {
    question: "d1b_3",
    branches: &[
        ask(YES, &D1B_TIME_VARYING_VALID_LOW),
        ask(WEAK_NO, &D1B_TIME_VARYING_VALID_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1B_TIME_VARYING_MODERATE: Node<RobinsJudgement> = Node {
    question: "d1b_3",
    branches: &[
        ask(YES_WEAK_NO, &D1B_TIME_VARYING_VALID_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1B_BASELINE_VALID: Node<RobinsJudgement> = Node {
    question: "d1b_2",
    branches: &[
        ask(YES, &D1B_TIME_VARYING_LOW),
        ask(WEAK_NO, &D1B_TIME_VARYING_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

static D1B_BASELINE_VALID_WEAK: Node<RobinsJudgement> = Node {
    question: "d1b_2",
    branches: &[
        ask(YES_WEAK_NO, &D1B_TIME_VARYING_MODERATE),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

pub static CONFOUNDING_ADHERING: Node<RobinsJudgement> = Node {
    question: "d1b_1",
    branches: &[
        ask(YES, &D1B_BASELINE_VALID),
        ask(WEAK_NO, &D1B_BASELINE_VALID_WEAK),
        ask(STRONG_NO_NI, &D1B_NEGATIVE_CONTROLS_SERIOUS),
    ],
};

// Domain 2: classification of interventions.

static D2_SUBSTANTIAL: Node<RobinsJudgement> = Node {
    question: "d2_4",
    branches: &[leaf(NO, MODERATE, "D2.R4"), leaf(YES_NI, SERIOUS, "D2.R5")],
};

static D2_ERRORS: Node<RobinsJudgement> = Node {
    question: "d2_3",
    branches: &[
        leaf(NO, LOW, "D2.R2"),
        leaf(NI, MODERATE, "D2.R3"),
        ask(YES, &D2_SUBSTANTIAL),
    ],
};

static D2_SUBSTANTIAL_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d2_4",
    branches: &[leaf(NO, MODERATE, "D2.R7"), leaf(YES_NI, SERIOUS, "D2.R8")],
};

static D2_ERRORS_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d2_3",
    branches: &[
        leaf(NO_NI, MODERATE, "D2.R6"),
        ask(YES, &D2_SUBSTANTIAL_UNCLEAR),
    ],
};

static D2_OUTCOME_KNOWLEDGE: Node<RobinsJudgement> = Node {
    question: "d2_2",
    branches: &[
        leaf(YES, SERIOUS, "D2.R1"),
        ask(NO, &D2_ERRORS),
        ask(NI, &D2_ERRORS_UNCLEAR),
    ],
};

pub static CLASSIFICATION: Node<RobinsJudgement> = Node {
    question: "d2_1",
    branches: &[ask(YES, &D2_ERRORS), ask(NO_NI, &D2_OUTCOME_KNOWLEDGE)],
};

// Domain 3: selection of participants.

static D3_CORRECTED: Node<RobinsJudgement> = Node {
    question: "d3_5",
    branches: &[leaf(YES, MODERATE, "D3.R3"), leaf(NO_NI, SERIOUS, "D3.R4")],
};

static D3_FOLLOW_UP: Node<RobinsJudgement> = Node {
    question: "d3_4",
    branches: &[
        leaf(YES, LOW, "D3.R1"),
        leaf(NI, MODERATE, "D3.R2"),
        ask(NO, &D3_CORRECTED),
    ],
};

static D3_FOLLOW_UP_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d3_4",
    branches: &[leaf(YES_NI, MODERATE, "D3.R5"), ask(NO, &D3_CORRECTED)],
};

static D3_OUTCOME_ASSOCIATED: Node<RobinsJudgement> = Node {
    question: "d3_3",
    branches: &[
        ask(NO, &D3_FOLLOW_UP),
        ask(NI, &D3_FOLLOW_UP_UNCLEAR),
        ask(YES, &D3_CORRECTED),
    ],
};

static D3_INTERVENTION_ASSOCIATED: Node<RobinsJudgement> = Node {
    question: "d3_2",
    branches: &[ask(NO, &D3_FOLLOW_UP), ask(YES_NI, &D3_OUTCOME_ASSOCIATED)],
};

pub static SELECTION: Node<RobinsJudgement> = Node {
    question: "d3_1",
    branches: &[
        ask(NO, &D3_FOLLOW_UP),
        ask(NI, &D3_FOLLOW_UP_UNCLEAR),
        ask(YES, &D3_INTERVENTION_ASSOCIATED),
    ],
};

// Domain 4: missing data.

static D4_MISSINGNESS: Node<RobinsJudgement> = Node {
    question: "d4_5",
    branches: &[leaf(NO, MODERATE, "D4.R3"), leaf(YES_NI, SERIOUS, "D4.R4")],
};

static D4_EVIDENCE_UNBIASED: Node<RobinsJudgement> = Node {
    question: "d4_4",
    branches: &[leaf(YES, LOW, "D4.R2"), ask(NO_NI, &D4_MISSINGNESS)],
};

static D4_CONFOUNDER_DATA: Node<RobinsJudgement> = Node {
    question: "d4_3",
    branches: &[leaf(YES, LOW, "D4.R1"), ask(NO_NI, &D4_EVIDENCE_UNBIASED)],
};

static D4_OUTCOME_DATA: Node<RobinsJudgement> = Node {
    question: "d4_2",
    branches: &[ask(YES, &D4_CONFOUNDER_DATA), ask(NO_NI, &D4_EVIDENCE_UNBIASED)],
};

pub static MISSING_DATA: Node<RobinsJudgement> = Node {
    question: "d4_1",
    branches: &[ask(YES, &D4_OUTCOME_DATA), ask(NO_NI, &D4_EVIDENCE_UNBIASED)],
};

// Domain 5: measurement of the outcome.

static D5_INFLUENCED: Node<RobinsJudgement> = Node {
    question: "d5_3",
    branches: &[
        leaf(NO, LOW, "D5.R3"),
        leaf(NI, MODERATE, "D5.R4"),
        leaf(YES, SERIOUS, "D5.R5"),
    ],
};

static D5_ASSESSORS_AWARE: Node<RobinsJudgement> = Node {
    question: "d5_2",
    branches: &[leaf(NO, LOW, "D5.R2"), ask(YES_NI, &D5_INFLUENCED)],
};

static D5_INFLUENCED_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d5_3",
    branches: &[leaf(NO_NI, MODERATE, "D5.R7"), leaf(YES, SERIOUS, "D5.R8")],
};

static D5_ASSESSORS_AWARE_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d5_2",
    branches: &[leaf(NO, MODERATE, "D5.R6"), ask(YES_NI, &D5_INFLUENCED_UNCLEAR)],
};

pub static OUTCOME_MEASUREMENT: Node<RobinsJudgement> = Node {
    question: "d5_1",
    branches: &[
        leaf(YES, SERIOUS, "D5.R1"),
        ask(NO, &D5_ASSESSORS_AWARE),
        ask(NI, &D5_ASSESSORS_AWARE_UNCLEAR),
    ],
};

// Domain 6: selection of the reported result. Any selective reporting is
// Serious; a clean slate is graded by the analysis plan; any NI caps at
// Moderate.

static D6_PLAN: Node<RobinsJudgement> = Node {
    question: "d6_1",
    branches: &[leaf(YES, LOW, "D6.R4"), leaf(NO_NI, MODERATE, "D6.R5")],
};

static D6_SUBGROUPS_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d6_4",
    branches: &[leaf(YES, SERIOUS, "D6.R3"), leaf(NO_NI, MODERATE, "D6.R6")],
};

static D6_SUBGROUPS: Node<RobinsJudgement> = Node {
    question: "d6_4",
    branches: &[
        leaf(YES, SERIOUS, "D6.R3"),
        ask(NO, &D6_PLAN),
        leaf(NI, MODERATE, "D6.R6"),
    ],
};

static D6_ANALYSES_UNCLEAR: Node<RobinsJudgement> = Node {
    question: "d6_3",
    branches: &[leaf(YES, SERIOUS, "D6.R2"), ask(NO_NI, &D6_SUBGROUPS_UNCLEAR)],
};

static D6_ANALYSES: Node<RobinsJudgement> = Node {
    question: "d6_3",
    branches: &[
        leaf(YES, SERIOUS, "D6.R2"),
        ask(NO, &D6_SUBGROUPS),
        ask(NI, &D6_SUBGROUPS_UNCLEAR),
    ],
};

pub static REPORTED_RESULT: Node<RobinsJudgement> = Node {
    question: "d6_2",
    branches: &[
        leaf(YES, SERIOUS, "D6.R1"),
        ask(NO, &D6_ANALYSES),
        ask(NI, &D6_ANALYSES_UNCLEAR),
    ],
};

pub static TREES: &DomainTrees<RobinsJudgement> = &[
    (DOMAIN1A, &[&CONFOUNDING_ASSIGNMENT]),
    (DOMAIN1B, &[&CONFOUNDING_ADHERING]),
    (DOMAIN2, &[&CLASSIFICATION]),
    (DOMAIN3, &[&SELECTION]),
    (DOMAIN4, &[&MISSING_DATA]),
    (DOMAIN5, &[&OUTCOME_MEASUREMENT]),
    (DOMAIN6, &[&REPORTED_RESULT]),
];

/// Score one domain's answers. Unknown domain keys are incomplete.
pub fn score_domain<A>(domain: &str, answers: &A) -> ScoringResult<RobinsJudgement>
where
    A: AnswerLookup + ?Sized,
{
    score_parts(TREES, domain, answers).0
}

/// The triage gate: the first gating question answered affirmatively ends the
/// assessment at Critical. `None` when the gate does not fire.
pub fn triage<A>(answers: &A) -> Option<ScoringResult<RobinsJudgement>>
where
    A: AnswerLookup + ?Sized,
{
    GATING_QUESTIONS
        .iter()
        .find(|question| answer::is_affirmative(answers.answer(question)))
        .map(|question| {
            let rule = format!("TRIAGE.{}", question.to_ascii_uppercase());
            tracing::debug!(question, rule = %rule, "triage gate triggered");
            ScoringResult::complete(CRITICAL, rule)
        })
}

/// Score every domain, aggregate the ones selected by the aim and let the
/// triage gate override the aggregate.
pub fn score_form(form: &RobinsForm) -> ChecklistScore<RobinsJudgement> {
    let unanswered = DomainResponse::default();
    let score = ChecklistScore::aggregate(DOMAINS, form.preliminary.aim, |template| {
        let response = form.domains.get(template.key);
        let (auto, parts) = score_parts(TREES, template.key, response.unwrap_or(&unanswered));
        DomainScore::new(auto, parts, response)
    });

    match triage(&form.triage) {
        Some(gate) => score.gated(gate),
        None => score,
    }
}
