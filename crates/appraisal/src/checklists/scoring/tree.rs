//! Table-driven decision trees.
//!
//! A tree is a set of `static` nodes. Each node names the question it reads
//! and an ordered list of branches; the first branch whose answer set holds the
//! normalized answer either ends at a rule-tagged leaf or moves on to another
//! node. An unanswered question, or an answer no branch accepts, halts the
//! walk with an incomplete result.

use crate::checklists::answer::{Answer, AnswerSet};
use crate::checklists::domain::AnswerLookup;
use crate::checklists::judgement::Severity;

use super::{worst_of, ScoringResult};

/// Decision trees of one instrument keyed by domain. A domain listing several
/// trees is scored part by part and the parts are combined with [`worst_of`].
pub type DomainTrees<J> = [(&'static str, &'static [&'static Node<J>])];

#[derive(Debug)]
pub struct Node<J: 'static> {
    pub question: &'static str,
    pub branches: &'static [Branch<J>],
}

#[derive(Debug)]
pub struct Branch<J: 'static> {
    pub when: AnswerSet,
    pub then: Step<J>,
}

#[derive(Debug)]
pub enum Step<J: 'static> {
    Leaf { judgement: J, rule: &'static str },
    Ask(&'static Node<J>),
}

pub const fn leaf<J>(when: AnswerSet, judgement: J, rule: &'static str) -> Branch<J> {
    Branch {
        when,
        then: Step::Leaf { judgement, rule },
    }
}

pub const fn ask<J>(when: AnswerSet, next: &'static Node<J>) -> Branch<J> {
    Branch {
        when,
        then: Step::Ask(next),
    }
}

impl<J: Severity> Node<J> {
    /// Walk the tree from this node over the given answers.
    pub fn evaluate<A>(&'static self, answers: &A) -> ScoringResult<J>
    where
        A: AnswerLookup + ?Sized,
    {
        let mut node = self;
        loop {
            let Some(answer) = answers.answer(node.question).map(Answer::normalize) else {
                return ScoringResult::incomplete();
            };
            let Some(branch) = node.branches.iter().find(|branch| branch.when.contains(answer))
            else {
                tracing::debug!(
                    question = node.question,
                    %answer,
                    "answer is not an option of this question"
                );
                return ScoringResult::incomplete();
            };
            match branch.then {
                Step::Leaf { judgement, rule } => {
                    tracing::trace!(rule, judgement = judgement.label(), "decision leaf reached");
                    return ScoringResult::complete(judgement, rule);
                }
                Step::Ask(next) => node = next,
            }
        }
    }

    /// Every leaf rule reachable from this node, deduplicated and sorted by id.
    pub fn rules(&'static self) -> Vec<&'static str> {
        let mut rules = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            for branch in node.branches.iter().rev() {
                match branch.then {
                    Step::Leaf { rule, .. } => {
                        if !rules.contains(&rule) {
                            rules.push(rule);
                        }
                    }
                    Step::Ask(next) => pending.push(next),
                }
            }
        }
        rules.sort_unstable();
        rules
    }

    /// Question keys this tree may read.
    pub fn questions(&'static self) -> Vec<&'static str> {
        let mut questions = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if !questions.contains(&node.question) {
                questions.push(node.question);
            }
            for branch in node.branches {
                if let Step::Ask(next) = branch.then {
                    pending.push(next);
                }
            }
        }
        questions.sort_unstable();
        questions
    }
}

/// Score one domain from its table entry, returning the domain result and,
/// for multi-part domains, each part's result. Unknown domains are incomplete.
pub fn score_parts<J, A>(
    table: &'static DomainTrees<J>,
    domain: &str,
    answers: &A,
) -> (ScoringResult<J>, Vec<ScoringResult<J>>)
where
    J: Severity,
    A: AnswerLookup + ?Sized,
{
    let Some((_, trees)) = table.iter().find(|(key, _)| *key == domain) else {
        tracing::debug!(domain, "no decision tree for domain");
        return (ScoringResult::incomplete(), Vec::new());
    };

    match trees {
        [tree] => (tree.evaluate(answers), Vec::new()),
        parts => {
            let parts: Vec<ScoringResult<J>> =
                parts.iter().map(|tree| tree.evaluate(answers)).collect();
            (worst_of(&parts), parts)
        }
    }
}
