use crate::infra::{parse_instrument, print_json};
use appraisal::checklists::schema::amstar;
use appraisal::checklists::schema::AmstarLabel;
use appraisal::checklists::{
    compare, create, reconcile, score_checklist, Answer, Checklist, ChecklistBody,
    EffectOfInterest, Instrument, NewChecklist, QuestionResponse, ReconcileChoice,
    ReconcileTarget, ScoreReport, Severity,
};
use appraisal::error::AppError;
use clap::Args;
use std::collections::BTreeMap;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Limit the demo to one instrument (ROB2, ROBINS_I or AMSTAR2)
    #[arg(long, value_parser = parse_instrument)]
    pub(crate) instrument: Option<Instrument>,
    /// Print the full score reports as JSON after the summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Appraisal checklist demo");

    let instruments: Vec<Instrument> = match args.instrument {
        Some(instrument) => vec![instrument],
        None => Instrument::ALL.to_vec(),
    };

    for instrument in instruments {
        let (first, second) = reviewer_pair(instrument)?;
        println!("\n{}", instrument.title());

        let first_report = score_checklist(&first);
        let second_report = score_checklist(&second);
        render_report(&first, &first_report);
        render_report(&second, &second_report);

        let comparison = compare(&first, &second)?;
        println!(
            "Agreement: {}/{} questions ({:.0}%) | {} critical and {} other disagreements",
            comparison.stats.agreements,
            comparison.stats.total,
            comparison.stats.agreement_rate * 100.0,
            comparison.stats.critical_disagreements,
            comparison.stats.non_critical_disagreements,
        );
        for row in &comparison.disagreements {
            println!(
                "  - {}: {} vs {}",
                row.key,
                row.reviewer1.as_deref().unwrap_or("unanswered"),
                row.reviewer2.as_deref().unwrap_or("unanswered"),
            );
        }

        let selections: BTreeMap<String, ReconcileChoice> = comparison
            .disagreements
            .iter()
            .map(|row| (row.key.clone(), ReconcileChoice::Reviewer2))
            .collect();
        let target = ReconcileTarget {
            id: format!("{}-consensus", instrument.code().to_ascii_lowercase()),
            name: format!("{} consensus", first.name),
            reviewer: Some("consensus".to_string()),
            created_at: None,
        };
        let consensus = reconcile(&first, &second, &target, &selections)?;
        let consensus_report = score_checklist(&consensus.checklist);
        println!(
            "Consensus (disagreements taken from reviewer 2): {}",
            consensus_report.overall_label()
        );

        if args.json {
            print_json(&consensus_report)?;
        }
    }

    Ok(())
}

fn render_report(checklist: &Checklist, report: &ScoreReport) {
    let reviewer = checklist.reviewer.as_deref().unwrap_or("unknown reviewer");
    println!("- {reviewer}: {}", report.overall_label());
    match report {
        ScoreReport::Rob2(score) => {
            for key in &score.active_domains {
                let domain = &score.domains[key.as_str()];
                println!(
                    "    {key}: {} ({})",
                    domain.judgement.map_or("Incomplete", |judgement| judgement.label()),
                    domain.auto.rule_id().unwrap_or("-"),
                );
            }
        }
        ScoreReport::RobinsI(score) => {
            if let Some(gate) = &score.gate {
                println!("    stopped at triage ({})", gate.rule_id().unwrap_or("-"));
            }
            for key in &score.active_domains {
                let domain = &score.domains[key.as_str()];
                println!(
                    "    {key}: {} ({})",
                    domain.judgement.map_or("Incomplete", |judgement| judgement.label()),
                    domain.auto.rule_id().unwrap_or("-"),
                );
            }
        }
        ScoreReport::Amstar2(score) => println!(
            "    {} critical and {} non-critical flaws",
            score.critical_flaws, score.non_critical_flaws
        ),
        ScoreReport::Error { reason } => println!("    {reason}"),
    }
}

fn reviewer_pair(instrument: Instrument) -> Result<(Checklist, Checklist), AppError> {
    let mut first = blank(instrument, "reviewer-1")?;
    let mut second = blank(instrument, "reviewer-2")?;

    match instrument {
        Instrument::Rob2 => {
            let shared = [
                ("domain1", "d1_1", Answer::Yes),
                ("domain1", "d1_3", Answer::No),
                ("domain2a", "d2a_1", Answer::No),
                ("domain2a", "d2a_2", Answer::No),
                ("domain2a", "d2a_6", Answer::Yes),
                ("domain3", "d3_1", Answer::Yes),
                ("domain4", "d4_1", Answer::No),
                ("domain4", "d4_2", Answer::No),
                ("domain4", "d4_3", Answer::No),
                ("domain5", "d5_1", Answer::Yes),
                ("domain5", "d5_2", Answer::No),
                ("domain5", "d5_3", Answer::No),
            ];
            for checklist in [&mut first, &mut second] {
                set_aim(checklist, EffectOfInterest::Assignment);
                for (domain, question, answer) in shared {
                    set_answer(checklist, domain, question, answer);
                }
            }
            set_answer(&mut first, "domain1", "d1_2", Answer::ProbablyYes);
            set_answer(&mut second, "domain1", "d1_2", Answer::NoInformation);
        }
        Instrument::RobinsI => {
            let shared = [
                ("domain1a", "d1a_1", Answer::Yes),
                ("domain1a", "d1a_2", Answer::WeakNo),
                ("domain1a", "d1a_3", Answer::No),
                ("domain1a", "d1a_4", Answer::No),
                ("domain2", "d2_1", Answer::Yes),
                ("domain2", "d2_3", Answer::No),
                ("domain3", "d3_1", Answer::No),
                ("domain3", "d3_4", Answer::Yes),
                ("domain4", "d4_1", Answer::Yes),
                ("domain4", "d4_2", Answer::Yes),
                ("domain4", "d4_3", Answer::Yes),
                ("domain5", "d5_1", Answer::No),
                ("domain5", "d5_2", Answer::No),
                ("domain6", "d6_1", Answer::Yes),
                ("domain6", "d6_2", Answer::No),
                ("domain6", "d6_3", Answer::No),
                ("domain6", "d6_4", Answer::No),
            ];
            for checklist in [&mut first, &mut second] {
                set_aim(checklist, EffectOfInterest::Assignment);
                set_triage(checklist, "b1", Answer::Yes);
                set_triage(checklist, "b3", Answer::No);
                for (domain, question, answer) in shared {
                    set_answer(checklist, domain, question, answer);
                }
            }
            set_triage(&mut first, "b2", Answer::No);
            set_triage(&mut second, "b2", Answer::ProbablyYes);
        }
        Instrument::Amstar2 => {
            for template in amstar::QUESTIONS {
                set_label(&mut first, template.key, AmstarLabel::Yes);
                set_label(&mut second, template.key, AmstarLabel::Yes);
            }
            set_label(&mut first, "q7", AmstarLabel::No);
            set_label(&mut second, "q7", AmstarLabel::PartialYes);
            set_label(&mut second, "q13", AmstarLabel::No);
            set_label(&mut first, "q10", AmstarLabel::No);
            set_label(&mut second, "q10", AmstarLabel::No);
        }
    }

    Ok((first, second))
}

fn blank(instrument: Instrument, reviewer: &str) -> Result<Checklist, AppError> {
    let study = match instrument {
        Instrument::Rob2 => "Exercise therapy for chronic low back pain (RCT)",
        Instrument::RobinsI => "Statin use and fracture risk (cohort)",
        Instrument::Amstar2 => "Probiotics for antibiotic-associated diarrhoea (review)",
    };
    Ok(create(NewChecklist {
        instrument,
        id: format!("{}-{reviewer}", instrument.code().to_ascii_lowercase()),
        name: study.to_string(),
        reviewer: Some(reviewer.to_string()),
        created_at: None,
    })?)
}

fn set_aim(checklist: &mut Checklist, aim: EffectOfInterest) {
    match &mut checklist.body {
        ChecklistBody::Rob2(form) => form.preliminary.aim = Some(aim),
        ChecklistBody::RobinsI(form) => form.preliminary.aim = Some(aim),
        ChecklistBody::Amstar2(_) => {}
    }
}

fn set_answer(checklist: &mut Checklist, domain: &str, question: &str, answer: Answer) {
    match &mut checklist.body {
        ChecklistBody::Rob2(form) => {
            if let Some(domain) = form.domains.get_mut(domain) {
                domain.set_answer(question, answer);
            }
        }
        ChecklistBody::RobinsI(form) => {
            if let Some(domain) = form.domains.get_mut(domain) {
                domain.set_answer(question, answer);
            }
        }
        ChecklistBody::Amstar2(_) => {}
    }
}

fn set_triage(checklist: &mut Checklist, question: &str, answer: Answer) {
    if let ChecklistBody::RobinsI(form) = &mut checklist.body {
        form.triage
            .insert(question.to_string(), QuestionResponse::answered(answer));
    }
}

fn set_label(checklist: &mut Checklist, key: &str, label: AmstarLabel) {
    let (ChecklistBody::Amstar2(form), Some(template)) = (&mut checklist.body, amstar::question(key))
    else {
        return;
    };
    let Some(index) = template.labels.iter().position(|candidate| *candidate == label) else {
        return;
    };
    if let Some(answer) = form.questions.get_mut(key) {
        answer.select(template.final_stage(), index);
    }
}
