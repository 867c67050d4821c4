use serde::{Deserialize, Serialize};

/// Scored label of a quality-tool question (the pick of its final stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmstarLabel {
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "Partial Yes")]
    PartialYes,
    #[serde(rename = "No")]
    No,
    #[serde(rename = "No meta-analysis conducted")]
    NoMetaAnalysis,
}

impl AmstarLabel {
    pub const fn label(self) -> &'static str {
        match self {
            AmstarLabel::Yes => "Yes",
            AmstarLabel::PartialYes => "Partial Yes",
            AmstarLabel::No => "No",
            AmstarLabel::NoMetaAnalysis => "No meta-analysis conducted",
        }
    }

    /// Position used when two sub-questions are consolidated; higher is worse.
    pub const fn rank(self) -> u8 {
        match self {
            AmstarLabel::Yes | AmstarLabel::NoMetaAnalysis => 0,
            AmstarLabel::PartialYes => 1,
            AmstarLabel::No => 2,
        }
    }
}

/// An intermediate refinement stage: one single-choice pick among its options.
#[derive(Debug, Serialize)]
pub struct StageTemplate {
    pub heading: &'static str,
    pub options: &'static [&'static str],
}

/// A stored quality-tool question.
#[derive(Debug, Serialize)]
pub struct AmstarQuestionTemplate {
    pub key: &'static str,
    pub number: &'static str,
    pub text: &'static str,
    pub critical: bool,
    /// Refinement stages preceding the final, scored stage.
    pub criteria: &'static [StageTemplate],
    /// Options of the final stage.
    pub labels: &'static [AmstarLabel],
}

impl AmstarQuestionTemplate {
    pub fn stage_count(&self) -> usize {
        self.criteria.len() + 1
    }

    pub fn final_stage(&self) -> usize {
        self.criteria.len()
    }

    pub fn option_count(&self, stage: usize) -> Option<usize> {
        if stage == self.final_stage() {
            Some(self.labels.len())
        } else {
            self.criteria.get(stage).map(|criteria| criteria.options.len())
        }
    }
}

/// A question as scored: either a stored question or a consolidated pair.
#[derive(Debug, Serialize)]
pub struct ScoredQuestion {
    pub key: &'static str,
    pub parts: &'static [&'static str],
}

const YES_NO: &[AmstarLabel] = &[AmstarLabel::Yes, AmstarLabel::No];
const GRADED: &[AmstarLabel] = &[AmstarLabel::Yes, AmstarLabel::PartialYes, AmstarLabel::No];
const META: &[AmstarLabel] = &[AmstarLabel::Yes, AmstarLabel::No, AmstarLabel::NoMetaAnalysis];

const MET: &[&str] = &["All criteria met", "Not all criteria met"];

pub static QUESTIONS: &[AmstarQuestionTemplate] = &[
    AmstarQuestionTemplate {
        key: "q1",
        number: "1",
        text: "Did the research questions and inclusion criteria for the review include the components of PICO?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: population, intervention, comparator group and outcome are described",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q2",
        number: "2",
        text: "Did the report of the review contain an explicit statement that the review methods were established prior to the conduct of the review and did the report justify any significant deviations from the protocol?",
        critical: true,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: a written protocol or guide states the review question(s), search strategy, inclusion/exclusion criteria and a risk of bias assessment",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: the protocol is registered and also specifies a meta-analysis/synthesis plan, a plan for investigating heterogeneity and justification for any deviations",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q3",
        number: "3",
        text: "Did the review authors explain their selection of the study designs for inclusion in the review?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: explanation for including only RCTs, only NRSI, or both",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q4",
        number: "4",
        text: "Did the review authors use a comprehensive literature search strategy?",
        critical: true,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: at least two databases searched, keywords and/or search strategy provided, publication restrictions justified",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: also searched reference lists, trial registries, consulted experts, searched grey literature and searched within 24 months of completion",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q5",
        number: "5",
        text: "Did the review authors perform study selection in duplicate?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: at least two reviewers independently agreed on study selection, or a sample was selected in duplicate with good agreement",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q6",
        number: "6",
        text: "Did the review authors perform data extraction in duplicate?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: at least two reviewers achieved consensus on which data to extract, or a sample was extracted in duplicate with good agreement",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q7",
        number: "7",
        text: "Did the review authors provide a list of excluded studies and justify the exclusions?",
        critical: true,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: provided a list of all potentially relevant studies read in full-text form but excluded",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: also justified the exclusion of each potentially relevant study",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q8",
        number: "8",
        text: "Did the review authors describe the included studies in adequate detail?",
        critical: false,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: described populations, interventions, comparators, outcomes and research designs",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: described these in detail, including study setting and timeframe for follow-up",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q9a",
        number: "9 (RCT)",
        text: "Did the review authors use a satisfactory technique for assessing the risk of bias in individual randomized controlled trials included in the review?",
        critical: true,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: assessed RoB from unconcealed allocation and lack of blinding when assessing outcomes",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: also assessed allocation sequence that was not truly random and selection of the reported result",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q9b",
        number: "9 (NRSI)",
        text: "Did the review authors use a satisfactory technique for assessing the risk of bias in individual non-randomized studies of interventions included in the review?",
        critical: true,
        criteria: &[
            StageTemplate {
                heading: "For Partial Yes: assessed RoB from confounding and from selection bias",
                options: MET,
            },
            StageTemplate {
                heading: "For Yes: also assessed methods used to ascertain exposures and outcomes and selection of the reported result",
                options: MET,
            },
        ],
        labels: GRADED,
    },
    AmstarQuestionTemplate {
        key: "q10",
        number: "10",
        text: "Did the review authors report on the sources of funding for the studies included in the review?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: reported the sources of funding for individual studies, or that the reviewers looked for this information",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q11a",
        number: "11 (RCT)",
        text: "If meta-analysis was performed, did the review authors use appropriate methods for statistical combination of results of randomized controlled trials?",
        critical: true,
        criteria: &[StageTemplate {
            heading: "For Yes: justified combining the data, used an appropriate weighted technique and investigated causes of heterogeneity",
            options: MET,
        }],
        labels: META,
    },
    AmstarQuestionTemplate {
        key: "q11b",
        number: "11 (NRSI)",
        text: "If meta-analysis was performed, did the review authors use appropriate methods for statistical combination of results of non-randomized studies of interventions?",
        critical: true,
        criteria: &[StageTemplate {
            heading: "For Yes: justified combining the data, combined effect estimates adjusted for confounding and reported separate estimates where RCTs and NRSI were both included",
            options: MET,
        }],
        labels: META,
    },
    AmstarQuestionTemplate {
        key: "q12",
        number: "12",
        text: "If meta-analysis was performed, did the review authors assess the potential impact of risk of bias in individual studies on the results of the meta-analysis or other evidence synthesis?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: included only low risk of bias RCTs, or performed analyses investigating the possible impact of risk of bias on summary estimates",
            options: MET,
        }],
        labels: META,
    },
    AmstarQuestionTemplate {
        key: "q13",
        number: "13",
        text: "Did the review authors account for risk of bias in individual studies when interpreting or discussing the results of the review?",
        critical: true,
        criteria: &[StageTemplate {
            heading: "For Yes: included only low risk of bias RCTs, or discussed the likely impact of risk of bias on the results",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q14",
        number: "14",
        text: "Did the review authors provide a satisfactory explanation for, and discussion of, any heterogeneity observed in the results of the review?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: there was no significant heterogeneity, or its sources were investigated and their impact discussed",
            options: MET,
        }],
        labels: YES_NO,
    },
    AmstarQuestionTemplate {
        key: "q15",
        number: "15",
        text: "If they performed quantitative synthesis, did the review authors carry out an adequate investigation of publication bias (small study bias) and discuss its likely impact on the results of the review?",
        critical: true,
        criteria: &[StageTemplate {
            heading: "For Yes: performed graphical or statistical tests for publication bias and discussed its likelihood and magnitude",
            options: MET,
        }],
        labels: META,
    },
    AmstarQuestionTemplate {
        key: "q16",
        number: "16",
        text: "Did the review authors report any potential sources of conflict of interest, including any funding they received for conducting the review?",
        critical: false,
        criteria: &[StageTemplate {
            heading: "For Yes: reported no competing interests, or described funding sources and how potential conflicts were managed",
            options: MET,
        }],
        labels: YES_NO,
    },
];

/// The sixteen scored questions; 9 and 11 consolidate their two stored parts.
pub static SCORED: &[ScoredQuestion] = &[
    ScoredQuestion { key: "q1", parts: &["q1"] },
    ScoredQuestion { key: "q2", parts: &["q2"] },
    ScoredQuestion { key: "q3", parts: &["q3"] },
    ScoredQuestion { key: "q4", parts: &["q4"] },
    ScoredQuestion { key: "q5", parts: &["q5"] },
    ScoredQuestion { key: "q6", parts: &["q6"] },
    ScoredQuestion { key: "q7", parts: &["q7"] },
    ScoredQuestion { key: "q8", parts: &["q8"] },
    ScoredQuestion { key: "q9", parts: &["q9a", "q9b"] },
    ScoredQuestion { key: "q10", parts: &["q10"] },
    ScoredQuestion { key: "q11", parts: &["q11a", "q11b"] },
    ScoredQuestion { key: "q12", parts: &["q12"] },
    ScoredQuestion { key: "q13", parts: &["q13"] },
    ScoredQuestion { key: "q14", parts: &["q14"] },
    ScoredQuestion { key: "q15", parts: &["q15"] },
    ScoredQuestion { key: "q16", parts: &["q16"] },
];

pub fn question(key: &str) -> Option<&'static AmstarQuestionTemplate> {
    QUESTIONS.iter().find(|template| template.key == key)
}

pub fn scored(key: &str) -> Option<&'static ScoredQuestion> {
    SCORED.iter().find(|scored| scored.key == key)
}
