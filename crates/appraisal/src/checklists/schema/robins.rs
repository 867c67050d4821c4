use super::{DomainTemplate, QuestionTemplate};
use crate::checklists::answer::{Answer, AnswerSet};
use crate::checklists::domain::EffectOfInterest;

pub const DOMAIN1A: &str = "domain1a";
pub const DOMAIN1B: &str = "domain1b";
pub const DOMAIN2: &str = "domain2";
pub const DOMAIN3: &str = "domain3";
pub const DOMAIN4: &str = "domain4";
pub const DOMAIN5: &str = "domain5";
pub const DOMAIN6: &str = "domain6";

const ANSWERED: AnswerSet = AnswerSet::STANDARD;
const CONDITIONAL: AnswerSet = AnswerSet::STANDARD.with(Answer::NotApplicable);
/// Graded options of the confounding-control questions.
const GRADED: AnswerSet = AnswerSet::YES
    .union(AnswerSet::WEAK_NO)
    .union(AnswerSet::STRONG_NO)
    .union(AnswerSet::NI);
const GRADED_CONDITIONAL: AnswerSet = GRADED.with(Answer::NotApplicable);

pub static TRIAGE: &[QuestionTemplate] = &[
    QuestionTemplate {
        key: "b1",
        number: "B1",
        text: "Did the authors make any attempt to control for confounding in the result being assessed?",
        options: AnswerSet::YES.union(AnswerSet::NO),
    },
    QuestionTemplate {
        key: "b2",
        number: "B2",
        text: "If N/PN to B1: Is there sufficient potential for confounding that an unadjusted result should not be considered further?",
        options: AnswerSet::YES.union(AnswerSet::NO).with(Answer::NotApplicable),
    },
    QuestionTemplate {
        key: "b3",
        number: "B3",
        text: "Was the method of measuring the outcome inappropriate?",
        options: AnswerSet::YES.union(AnswerSet::NO),
    },
];

/// Triage questions whose affirmative answer ends the assessment at Critical.
pub const GATING_QUESTIONS: [&str; 2] = ["b2", "b3"];

pub static DOMAINS: &[DomainTemplate] = &[
    DomainTemplate {
        key: DOMAIN1A,
        title: "Bias due to confounding (effect of assignment to intervention)",
        variant: Some(EffectOfInterest::Assignment),
        questions: &[
            QuestionTemplate {
                key: "d1a_1",
                number: "1.1",
                text: "Did the authors control for all the important confounding factors for which this was necessary?",
                options: GRADED,
            },
            QuestionTemplate {
                key: "d1a_2",
                number: "1.2",
                text: "If Y/PY/WN to 1.1: Were confounding factors that were controlled for (and for which control was necessary) measured validly and reliably by the variables available in this study?",
                options: GRADED_CONDITIONAL,
            },
            QuestionTemplate {
                key: "d1a_3",
                number: "1.3",
                text: "If Y/PY/WN to 1.1: Did the authors control for any variables measured after the start of intervention that could have been affected by the intervention?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d1a_4",
                number: "1.4",
                text: "Did the use of negative controls, or other considerations, suggest serious uncontrolled confounding?",
                options: ANSWERED,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN1B,
        title: "Bias due to confounding (effect of starting and adhering to intervention)",
        variant: Some(EffectOfInterest::Adhering),
        questions: &[
            QuestionTemplate {
                key: "d1b_1",
                number: "1.1",
                text: "Did the authors control for all the important baseline confounding factors for which this was necessary?",
                options: GRADED,
            },
            QuestionTemplate {
                key: "d1b_2",
                number: "1.2",
                text: "If Y/PY/WN to 1.1: Were baseline confounding factors that were controlled for measured validly and reliably by the variables available in this study?",
                options: GRADED_CONDITIONAL,
            },
            QuestionTemplate {
                key: "d1b_3",
                number: "1.3",
                text: "Did the authors control for all the important time-varying confounding factors, using a method appropriate for confounders affected by prior intervention?",
                options: GRADED_CONDITIONAL,
            },
            QuestionTemplate {
                key: "d1b_4",
                number: "1.4",
                text: "If Y/PY/WN to 1.3: Were time-varying confounding factors that were controlled for measured validly and reliably?",
                options: GRADED_CONDITIONAL,
            },
            QuestionTemplate {
                key: "d1b_5",
                number: "1.5",
                text: "Did the use of negative controls, or other considerations, suggest serious uncontrolled confounding?",
                options: ANSWERED,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN2,
        title: "Bias in classification of interventions",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d2_1",
                number: "2.1",
                text: "Was intervention status classified solely according to information collected at the time of intervention?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2_2",
                number: "2.2",
                text: "If N/PN/NI to 2.1: Could classification of intervention status have been affected by knowledge of the outcome or risk of the outcome?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2_3",
                number: "2.3",
                text: "Were there errors in classification of intervention status that were unrelated to the outcome?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2_4",
                number: "2.4",
                text: "If Y/PY to 2.3: Were such errors likely to be substantial?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN3,
        title: "Bias in selection of participants into the study (or into the analysis)",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d3_1",
                number: "3.1",
                text: "Was selection of participants into the study (or into the analysis) based on participant characteristics observed after the start of intervention?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d3_2",
                number: "3.2",
                text: "If Y/PY to 3.1: Were the post-intervention variables that influenced selection likely to be associated with intervention?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d3_3",
                number: "3.3",
                text: "If Y/PY/NI to 3.2: Were the post-intervention variables that influenced selection likely to be influenced by the outcome or a cause of the outcome?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d3_4",
                number: "3.4",
                text: "Do start of follow-up and start of intervention coincide for most participants?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d3_5",
                number: "3.5",
                text: "If Y/PY to 3.3, or N/PN to 3.4: Were adjustment techniques used that are likely to correct for the presence of selection biases?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN4,
        title: "Bias due to missing data",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d4_1",
                number: "4.1",
                text: "Were complete data on intervention status available for all, or nearly all, participants?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d4_2",
                number: "4.2",
                text: "Were complete data on the outcome available for all, or nearly all, participants?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d4_3",
                number: "4.3",
                text: "Were complete data on important confounding factors available for all, or nearly all, participants?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d4_4",
                number: "4.4",
                text: "If N/PN/NI to 4.1, 4.2 or 4.3: Is there evidence that the result was not biased by missing data (e.g. an appropriate imputation or sensitivity analysis)?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d4_5",
                number: "4.5",
                text: "If N/PN/NI to 4.4: Is it likely that missingness depended on the true value of the outcome?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN5,
        title: "Bias in measurement of the outcome",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d5_1",
                number: "5.1",
                text: "Could measurement or ascertainment of the outcome have differed between intervention groups?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d5_2",
                number: "5.2",
                text: "Were outcome assessors aware of the intervention received by study participants?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d5_3",
                number: "5.3",
                text: "If Y/PY/NI to 5.2: Could the assessment of the outcome have been influenced by knowledge of the intervention received?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN6,
        title: "Bias in selection of the reported result",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d6_1",
                number: "6.1",
                text: "Was the result reported in accordance with an available, pre-determined analysis plan?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d6_2",
                number: "6.2",
                text: "Is the reported effect estimate likely to be selected, on the basis of the results, from multiple outcome measurements within the outcome domain?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d6_3",
                number: "6.3",
                text: "Is the reported effect estimate likely to be selected, on the basis of the results, from multiple analyses of the intervention-outcome relationship?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d6_4",
                number: "6.4",
                text: "Is the reported effect estimate likely to be selected, on the basis of the results, from different subgroups?",
                options: ANSWERED,
            },
        ],
    },
];

pub fn domain(key: &str) -> Option<&'static DomainTemplate> {
    DOMAINS.iter().find(|template| template.key == key)
}

pub fn triage_question(key: &str) -> Option<&'static QuestionTemplate> {
    TRIAGE.iter().find(|question| question.key == key)
}
