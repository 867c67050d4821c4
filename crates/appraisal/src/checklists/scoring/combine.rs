use crate::checklists::judgement::{worst, Severity};

use super::ScoringResult;

/// Combine independently scored parts of one domain.
///
/// Every part must be complete; the result is the worst part judgement and its
/// rule id joins the parts' rule ids with `+` for audit.
pub fn worst_of<J: Severity>(parts: &[ScoringResult<J>]) -> ScoringResult<J> {
    if parts.is_empty() || parts.iter().any(|part| !part.is_complete()) {
        return ScoringResult::incomplete();
    }

    let judgement = worst(parts.iter().filter_map(ScoringResult::judgement));
    let rule = parts
        .iter()
        .filter_map(ScoringResult::rule_id)
        .collect::<Vec<_>>()
        .join("+");

    match judgement {
        Some(judgement) => ScoringResult::complete(judgement, rule),
        None => ScoringResult::incomplete(),
    }
}
