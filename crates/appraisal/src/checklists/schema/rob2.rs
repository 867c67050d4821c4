use super::{DomainTemplate, QuestionTemplate};
use crate::checklists::answer::{Answer, AnswerSet};
use crate::checklists::domain::EffectOfInterest;

pub const DOMAIN1: &str = "domain1";
pub const DOMAIN2A: &str = "domain2a";
pub const DOMAIN2B: &str = "domain2b";
pub const DOMAIN3: &str = "domain3";
pub const DOMAIN4: &str = "domain4";
pub const DOMAIN5: &str = "domain5";

const ANSWERED: AnswerSet = AnswerSet::STANDARD;
const CONDITIONAL: AnswerSet = AnswerSet::STANDARD.with(Answer::NotApplicable);

pub static DOMAINS: &[DomainTemplate] = &[
    DomainTemplate {
        key: DOMAIN1,
        title: "Bias arising from the randomization process",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d1_1",
                number: "1.1",
                text: "Was the allocation sequence random?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d1_2",
                number: "1.2",
                text: "Was the allocation sequence concealed until participants were enrolled and assigned to interventions?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d1_3",
                number: "1.3",
                text: "Did baseline differences between intervention groups suggest a problem with the randomization process?",
                options: ANSWERED,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN2A,
        title: "Bias due to deviations from intended interventions (effect of assignment to intervention)",
        variant: Some(EffectOfInterest::Assignment),
        questions: &[
            QuestionTemplate {
                key: "d2a_1",
                number: "2.1",
                text: "Were participants aware of their assigned intervention during the trial?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2a_2",
                number: "2.2",
                text: "Were carers and people delivering the interventions aware of participants' assigned intervention during the trial?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2a_3",
                number: "2.3",
                text: "If Y/PY/NI to 2.1 or 2.2: Were there deviations from the intended intervention that arose because of the trial context?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2a_4",
                number: "2.4",
                text: "If Y/PY to 2.3: Were these deviations likely to have affected the outcome?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2a_5",
                number: "2.5",
                text: "If Y/PY/NI to 2.4: Were these deviations from intended intervention balanced between groups?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2a_6",
                number: "2.6",
                text: "Was an appropriate analysis used to estimate the effect of assignment to intervention?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2a_7",
                number: "2.7",
                text: "If N/PN/NI to 2.6: Was there potential for a substantial impact (on the result) of the failure to analyse participants in the group to which they were randomized?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN2B,
        title: "Bias due to deviations from intended interventions (effect of adhering to intervention)",
        variant: Some(EffectOfInterest::Adhering),
        questions: &[
            QuestionTemplate {
                key: "d2b_1",
                number: "2.1",
                text: "Were participants aware of their assigned intervention during the trial?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2b_2",
                number: "2.2",
                text: "Were carers and people delivering the interventions aware of participants' assigned intervention during the trial?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d2b_3",
                number: "2.3",
                text: "If Y/PY/NI to 2.1 or 2.2: Were important non-protocol interventions balanced across intervention groups?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2b_4",
                number: "2.4",
                text: "Were there failures in implementing the intervention that could have affected the outcome?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2b_5",
                number: "2.5",
                text: "Was there non-adherence to the assigned intervention regimen that could have affected participants' outcomes?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d2b_6",
                number: "2.6",
                text: "If N/PN/NI to 2.3, or Y/PY/NI to 2.4 or 2.5: Was an appropriate analysis used to estimate the effect of adhering to the intervention?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN3,
        title: "Bias due to missing outcome data",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d3_1",
                number: "3.1",
                text: "Were data for this outcome available for all, or nearly all, participants randomized?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d3_2",
                number: "3.2",
                text: "If N/PN/NI to 3.1: Is there evidence that the result was not biased by missing outcome data?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d3_3",
                number: "3.3",
                text: "If N/PN to 3.2: Could missingness in the outcome depend on its true value?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d3_4",
                number: "3.4",
                text: "If Y/PY/NI to 3.3: Is it likely that missingness in the outcome depended on its true value?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN4,
        title: "Bias in measurement of the outcome",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d4_1",
                number: "4.1",
                text: "Was the method of measuring the outcome inappropriate?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d4_2",
                number: "4.2",
                text: "Could measurement or ascertainment of the outcome have differed between intervention groups?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d4_3",
                number: "4.3",
                text: "If N/PN/NI to 4.1 and 4.2: Were outcome assessors aware of the intervention received by study participants?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d4_4",
                number: "4.4",
                text: "If Y/PY/NI to 4.3: Could assessment of the outcome have been influenced by knowledge of intervention received?",
                options: CONDITIONAL,
            },
            QuestionTemplate {
                key: "d4_5",
                number: "4.5",
                text: "If Y/PY/NI to 4.4: Is it likely that assessment of the outcome was influenced by knowledge of intervention received?",
                options: CONDITIONAL,
            },
        ],
    },
    DomainTemplate {
        key: DOMAIN5,
        title: "Bias in selection of the reported result",
        variant: None,
        questions: &[
            QuestionTemplate {
                key: "d5_1",
                number: "5.1",
                text: "Were the data that produced this result analysed in accordance with a pre-specified analysis plan that was finalized before unblinded outcome data were available for analysis?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d5_2",
                number: "5.2",
                text: "Is the numerical result being assessed likely to have been selected, on the basis of the results, from multiple eligible outcome measurements (e.g. scales, definitions, time points) within the outcome domain?",
                options: ANSWERED,
            },
            QuestionTemplate {
                key: "d5_3",
                number: "5.3",
                text: "Is the numerical result being assessed likely to have been selected, on the basis of the results, from multiple eligible analyses of the data?",
                options: ANSWERED,
            },
        ],
    },
];

pub fn domain(key: &str) -> Option<&'static DomainTemplate> {
    DOMAINS.iter().find(|template| template.key == key)
}
