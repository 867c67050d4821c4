use crate::infra::{parse_instrument, print_json, read_json};
use appraisal::checklists::{
    compare_json, create, reconcile, score_json, Checklist, Comparison, Instrument, NewChecklist,
    ReconcileChoice, ReconcileTarget, ReconciledChecklist, ScoreReport,
};
use appraisal::error::AppError;
use clap::Args;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct NewArgs {
    /// Instrument: ROB2, ROBINS_I or AMSTAR2
    #[arg(long, value_parser = parse_instrument)]
    pub(crate) instrument: Instrument,
    /// Identifier of the new checklist
    #[arg(long)]
    pub(crate) id: String,
    /// Display name, usually the study or review being appraised
    #[arg(long)]
    pub(crate) name: String,
    /// Reviewer filling in the checklist
    #[arg(long)]
    pub(crate) reviewer: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Checklist JSON file
    pub(crate) path: PathBuf,
    /// Print only the overall judgement instead of the full report
    #[arg(long)]
    pub(crate) summary: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// First reviewer's checklist JSON file
    pub(crate) reviewer1: PathBuf,
    /// Second reviewer's checklist JSON file
    pub(crate) reviewer2: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ReconcileArgs {
    /// First reviewer's checklist JSON file (default source of every answer)
    pub(crate) reviewer1: PathBuf,
    /// Second reviewer's checklist JSON file
    pub(crate) reviewer2: PathBuf,
    /// Identifier of the consensus checklist
    #[arg(long)]
    pub(crate) id: String,
    /// Display name of the consensus checklist
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) reviewer: Option<String>,
    /// JSON file mapping question keys to reconcile choices
    #[arg(long)]
    pub(crate) selections: Option<PathBuf>,
}

pub(crate) fn run_new(args: NewArgs) -> Result<(), AppError> {
    print_json(&new_checklist(args)?)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let report = score_file(&args)?;
    if args.summary {
        println!("{}", report.overall_label());
        return Ok(());
    }
    print_json(&report)
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    print_json(&compare_files(&args)?)
}

pub(crate) fn run_reconcile(args: ReconcileArgs) -> Result<(), AppError> {
    let reconciled = reconcile_files(args)?;
    for key in &reconciled.ignored_selections {
        eprintln!("warning: selection '{key}' matched no question and was ignored");
    }
    print_json(&reconciled)
}

fn new_checklist(args: NewArgs) -> Result<Checklist, AppError> {
    Ok(create(NewChecklist {
        instrument: args.instrument,
        id: args.id,
        name: args.name,
        reviewer: args.reviewer,
        created_at: None,
    })?)
}

fn score_file(args: &ScoreArgs) -> Result<ScoreReport, AppError> {
    let document: Value = read_json(&args.path)?;
    Ok(score_json(&document))
}

fn compare_files(args: &CompareArgs) -> Result<Comparison, AppError> {
    let first: Value = read_json(&args.reviewer1)?;
    let second: Value = read_json(&args.reviewer2)?;
    Ok(compare_json(&first, &second)?)
}

fn reconcile_files(args: ReconcileArgs) -> Result<ReconciledChecklist, AppError> {
    let first: Checklist = read_json(&args.reviewer1)?;
    let second: Checklist = read_json(&args.reviewer2)?;
    let selections: BTreeMap<String, ReconcileChoice> = match &args.selections {
        Some(path) => read_json(path)?,
        None => BTreeMap::new(),
    };
    let target = ReconcileTarget {
        id: args.id,
        name: args.name,
        reviewer: args.reviewer,
        created_at: None,
    };
    Ok(reconcile(&first, &second, &target, &selections)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appraisal::checklists::{ChecklistBody, Rob2Judgement};
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn scratch(name: &str, value: &impl serde::Serialize) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("appraisal-api-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir");
        let path = dir.join(name);
        fs::write(&path, serde_json::to_vec(value).expect("serializes")).expect("writes");
        path
    }

    fn trial(id: &str, concealment: &str) -> Checklist {
        let mut checklist = new_checklist(NewArgs {
            instrument: Instrument::Rob2,
            id: id.to_string(),
            name: "Trial".to_string(),
            reviewer: None,
        })
        .expect("valid");
        let ChecklistBody::Rob2(form) = &mut checklist.body else {
            unreachable!();
        };
        let domain1 = form.domains.get_mut("domain1").expect("domain1");
        domain1.set_answer("d1_2", concealment.parse().expect("code"));
        checklist
    }

    #[test]
    fn new_rejects_blank_ids() {
        let result = new_checklist(NewArgs {
            instrument: Instrument::Amstar2,
            id: " ".to_string(),
            name: "Review".to_string(),
            reviewer: None,
        });
        assert!(matches!(result, Err(AppError::Checklist(_))));
    }

    #[test]
    fn score_reads_checklist_files() {
        let path = scratch("score.json", &trial("t-1", "N"));
        let report = score_file(&ScoreArgs {
            path,
            summary: true,
        })
        .expect("scores");
        let ScoreReport::Rob2(score) = report else {
            panic!("expected a randomized-trial report");
        };
        assert_eq!(
            score.domains["domain1"].auto.judgement(),
            Some(Rob2Judgement::High)
        );
    }

    #[test]
    fn compare_and_reconcile_files() {
        let first = scratch("r1.json", &trial("t-1", "N"));
        let second = scratch("r2.json", &trial("t-2", "Y"));
        let comparison = compare_files(&CompareArgs {
            reviewer1: first.clone(),
            reviewer2: second.clone(),
        })
        .expect("compares");
        assert_eq!(comparison.stats.disagreements, 1);

        let selections = scratch("choices.json", &json!({ "d1_2": { "source": "reviewer2" } }));
        let reconciled = reconcile_files(ReconcileArgs {
            reviewer1: first,
            reviewer2: second,
            id: "t-c".to_string(),
            name: "Consensus".to_string(),
            reviewer: None,
            selections: Some(selections),
        })
        .expect("reconciles");
        let ChecklistBody::Rob2(form) = &reconciled.checklist.body else {
            unreachable!();
        };
        assert_eq!(
            form.domains["domain1"].answer("d1_2").map(|answer| answer.code()),
            Some("Y")
        );
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = scratch("broken.json", &"not a checklist");
        fs::write(&path, b"{ broken").expect("writes");
        let result = read_json::<Value>(Path::new(&path));
        assert!(matches!(result, Err(AppError::Json(_))));
    }
}
