//! Decision tables of the randomized-trial tool.

use crate::checklists::answer::AnswerSet;
use crate::checklists::domain::{AnswerLookup, DomainResponse, Rob2Form};
use crate::checklists::judgement::Rob2Judgement;
use crate::checklists::schema::rob2::{
    DOMAIN1, DOMAIN2A, DOMAIN2B, DOMAIN3, DOMAIN4, DOMAIN5, DOMAINS,
};

use super::tree::{ask, leaf, score_parts, DomainTrees, Node};
use super::{ChecklistScore, DomainScore, ScoringResult};

const LOW: Rob2Judgement = Rob2Judgement::Low;
const SOME: Rob2Judgement = Rob2Judgement::SomeConcerns;
const HIGH: Rob2Judgement = Rob2Judgement::High;

const YES: AnswerSet = AnswerSet::YES;
const NO: AnswerSet = AnswerSet::NO;
const NI: AnswerSet = AnswerSet::NI;
const YES_NI: AnswerSet = AnswerSet::YES_NI;
const NO_NI: AnswerSet = AnswerSet::NO_NI;

// Domain 1: randomization process. Root is concealment (1.2).

static D1_BASELINE_CONCEALED: Node<Rob2Judgement> = Node {
    question: "d1_3",
    branches: &[leaf(NO_NI, LOW, "D1.R3"), leaf(YES, SOME, "D1.R4")],
};

static D1_SEQUENCE: Node<Rob2Judgement> = Node {
    question: "d1_1",
    branches: &[leaf(NO, SOME, "D1.R2"), ask(YES_NI, &D1_BASELINE_CONCEALED)],
};

static D1_BASELINE_UNCLEAR: Node<Rob2Judgement> = Node {
    question: "d1_3",
    branches: &[leaf(NO_NI, SOME, "D1.R5"), leaf(YES, HIGH, "D1.R6")],
};

pub static RANDOMIZATION: Node<Rob2Judgement> = Node {
    question: "d1_2",
    branches: &[
        leaf(NO, HIGH, "D1.R1"),
        ask(YES, &D1_SEQUENCE),
        ask(NI, &D1_BASELINE_UNCLEAR),
    ],
};

// Domain 2, effect of assignment. Part 1: deviations arising from the trial
// context. Part 2: appropriateness of the analysis.

static D2A_BALANCED: Node<Rob2Judgement> = Node {
    question: "d2a_5",
    branches: &[
        leaf(YES, SOME, "D2A.P1.R5"),
        leaf(NO_NI, HIGH, "D2A.P1.R6"),
    ],
};

static D2A_AFFECTED_OUTCOME: Node<Rob2Judgement> = Node {
    question: "d2a_4",
    branches: &[leaf(NO, SOME, "D2A.P1.R4"), ask(YES_NI, &D2A_BALANCED)],
};

static D2A_CONTEXT_DEVIATIONS: Node<Rob2Judgement> = Node {
    question: "d2a_3",
    branches: &[
        leaf(NO, LOW, "D2A.P1.R2"),
        leaf(NI, SOME, "D2A.P1.R3"),
        ask(YES, &D2A_AFFECTED_OUTCOME),
    ],
};

static D2A_CARERS_AWARE: Node<Rob2Judgement> = Node {
    question: "d2a_2",
    branches: &[
        leaf(NO, LOW, "D2A.P1.R1"),
        ask(YES_NI, &D2A_CONTEXT_DEVIATIONS),
    ],
};

pub static ASSIGNMENT_DEVIATIONS: Node<Rob2Judgement> = Node {
    question: "d2a_1",
    branches: &[
        ask(NO, &D2A_CARERS_AWARE),
        ask(YES_NI, &D2A_CONTEXT_DEVIATIONS),
    ],
};

static D2A_ANALYSIS_IMPACT: Node<Rob2Judgement> = Node {
    question: "d2a_7",
    branches: &[
        leaf(NO, SOME, "D2A.P2.R2"),
        leaf(YES_NI, HIGH, "D2A.P2.R3"),
    ],
};

pub static ASSIGNMENT_ANALYSIS: Node<Rob2Judgement> = Node {
    question: "d2a_6",
    branches: &[
        leaf(YES, LOW, "D2A.P2.R1"),
        ask(NO_NI, &D2A_ANALYSIS_IMPACT),
    ],
};

// Domain 2, effect of adhering.

static D2B_ANALYSIS: Node<Rob2Judgement> = Node {
    question: "d2b_6",
    branches: &[leaf(YES, SOME, "D2B.R2"), leaf(NO_NI, HIGH, "D2B.R3")],
};

static D2B_NON_ADHERENCE: Node<Rob2Judgement> = Node {
    question: "d2b_5",
    branches: &[leaf(NO, LOW, "D2B.R1"), ask(YES_NI, &D2B_ANALYSIS)],
};

static D2B_IMPLEMENTATION: Node<Rob2Judgement> = Node {
    question: "d2b_4",
    branches: &[ask(NO, &D2B_NON_ADHERENCE), ask(YES_NI, &D2B_ANALYSIS)],
};

static D2B_CO_INTERVENTIONS: Node<Rob2Judgement> = Node {
    question: "d2b_3",
    branches: &[ask(YES, &D2B_IMPLEMENTATION), ask(NO_NI, &D2B_ANALYSIS)],
};

static D2B_CARERS_AWARE: Node<Rob2Judgement> = Node {
    question: "d2b_2",
    branches: &[ask(NO, &D2B_IMPLEMENTATION), ask(YES_NI, &D2B_CO_INTERVENTIONS)],
};

pub static ADHERENCE_DEVIATIONS: Node<Rob2Judgement> = Node {
    question: "d2b_1",
    branches: &[ask(NO, &D2B_CARERS_AWARE), ask(YES_NI, &D2B_CO_INTERVENTIONS)],
};

// Domain 3: missing outcome data.

static D3_LIKELY_DEPENDS: Node<Rob2Judgement> = Node {
    question: "d3_4",
    branches: &[leaf(NO, SOME, "D3.R4"), leaf(YES_NI, HIGH, "D3.R5")],
};

static D3_COULD_DEPEND: Node<Rob2Judgement> = Node {
    question: "d3_3",
    branches: &[leaf(NO, LOW, "D3.R3"), ask(YES_NI, &D3_LIKELY_DEPENDS)],
};

static D3_EVIDENCE_UNBIASED: Node<Rob2Judgement> = Node {
    question: "d3_2",
    branches: &[leaf(YES, LOW, "D3.R2"), ask(NO_NI, &D3_COULD_DEPEND)],
};

pub static MISSING_OUTCOME_DATA: Node<Rob2Judgement> = Node {
    question: "d3_1",
    branches: &[leaf(YES, LOW, "D3.R1"), ask(NO_NI, &D3_EVIDENCE_UNBIASED)],
};

// Domain 4: measurement of the outcome. An unclear difference between groups
// (4.2 = NI) caps the favourable leaves at Some concerns.

static D4_LIKELY_INFLUENCED: Node<Rob2Judgement> = Node {
    question: "d4_5",
    branches: &[leaf(NO, SOME, "D4.R5"), leaf(YES_NI, HIGH, "D4.R6")],
};

static D4_COULD_INFLUENCE: Node<Rob2Judgement> = Node {
    question: "d4_4",
    branches: &[leaf(NO, LOW, "D4.R4"), ask(YES_NI, &D4_LIKELY_INFLUENCED)],
};

static D4_ASSESSORS_AWARE: Node<Rob2Judgement> = Node {
    question: "d4_3",
    branches: &[leaf(NO, LOW, "D4.R3"), ask(YES_NI, &D4_COULD_INFLUENCE)],
};

static D4_LIKELY_INFLUENCED_UNCLEAR: Node<Rob2Judgement> = Node {
    question: "d4_5",
    branches: &[leaf(NO, SOME, "D4.R9"), leaf(YES_NI, HIGH, "D4.R10")],
};

static D4_COULD_INFLUENCE_UNCLEAR: Node<Rob2Judgement> = Node {
    question: "d4_4",
    branches: &[
        leaf(NO, SOME, "D4.R8"),
        ask(YES_NI, &D4_LIKELY_INFLUENCED_UNCLEAR),
    ],
};

static D4_ASSESSORS_AWARE_UNCLEAR: Node<Rob2Judgement> = Node {
    question: "d4_3",
    branches: &[
        leaf(NO, SOME, "D4.R7"),
        ask(YES_NI, &D4_COULD_INFLUENCE_UNCLEAR),
    ],
};

static D4_DIFFERED: Node<Rob2Judgement> = Node {
    question: "d4_2",
    branches: &[
        leaf(YES, HIGH, "D4.R2"),
        ask(NO, &D4_ASSESSORS_AWARE),
        ask(NI, &D4_ASSESSORS_AWARE_UNCLEAR),
    ],
};

pub static OUTCOME_MEASUREMENT: Node<Rob2Judgement> = Node {
    question: "d4_1",
    branches: &[leaf(YES, HIGH, "D4.R1"), ask(NO_NI, &D4_DIFFERED)],
};

// Domain 5: selection of the reported result. Root is selection from multiple
// outcome measurements (5.2).

static D5_PRESPECIFIED: Node<Rob2Judgement> = Node {
    question: "d5_1",
    branches: &[leaf(YES, LOW, "D5.R4"), leaf(NO_NI, SOME, "D5.R5")],
};

static D5_ANALYSES: Node<Rob2Judgement> = Node {
    question: "d5_3",
    branches: &[
        leaf(YES, HIGH, "D5.R2"),
        ask(NO, &D5_PRESPECIFIED),
        leaf(NI, SOME, "D5.R3"),
    ],
};

static D5_ANALYSES_UNCLEAR: Node<Rob2Judgement> = Node {
    question: "d5_3",
    branches: &[leaf(YES, HIGH, "D5.R2"), leaf(NO_NI, SOME, "D5.R3")],
};

pub static REPORTED_RESULT: Node<Rob2Judgement> = Node {
    question: "d5_2",
    branches: &[
        leaf(YES, HIGH, "D5.R1"),
        ask(NO, &D5_ANALYSES),
        ask(NI, &D5_ANALYSES_UNCLEAR),
    ],
};

/// Trees per domain key; domain 2 (assignment) is scored in two parts.
pub static TREES: &DomainTrees<Rob2Judgement> = &[
    (DOMAIN1, &[&RANDOMIZATION]),
    (DOMAIN2A, &[&ASSIGNMENT_DEVIATIONS, &ASSIGNMENT_ANALYSIS]),
    (DOMAIN2B, &[&ADHERENCE_DEVIATIONS]),
    (DOMAIN3, &[&MISSING_OUTCOME_DATA]),
    (DOMAIN4, &[&OUTCOME_MEASUREMENT]),
    (DOMAIN5, &[&REPORTED_RESULT]),
];

/// Score one domain's answers. Unknown domain keys are incomplete.
pub fn score_domain<A>(domain: &str, answers: &A) -> ScoringResult<Rob2Judgement>
where
    A: AnswerLookup + ?Sized,
{
    score_parts(TREES, domain, answers).0
}

/// Score every domain and aggregate the ones selected by the aim.
pub fn score_form(form: &Rob2Form) -> ChecklistScore<Rob2Judgement> {
    let unanswered = DomainResponse::default();
    ChecklistScore::aggregate(DOMAINS, form.preliminary.aim, |template| {
        let response = form.domains.get(template.key);
        let (auto, parts) = score_parts(TREES, template.key, response.unwrap_or(&unanswered));
        DomainScore::new(auto, parts, response)
    })
}
