use crate::infra::{default_analysis_config, InMemoryAlertNotifier, InMemorySurveyRepository};
use chrono::{Duration, Utc};
use clap::Args;
use std::sync::Arc;
use survey_ai::error::AppError;
use survey_ai::workflows::surveys::submissions::{
    Answer, LocalKeywordClassifier, RawAnswer, SurveyMetadata, SurveyRecord, SurveyRepository,
    SurveyStatus, SurveySubmission, SurveySubmissionService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the reprocessing portion of the demo
    #[arg(long)]
    pub(crate) skip_reprocess: bool,
}

type DemoService =
    SurveySubmissionService<InMemorySurveyRepository, InMemoryAlertNotifier, LocalKeywordClassifier>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Survey sentiment demo (offline keyword classifier)");

    let repository = Arc::new(InMemorySurveyRepository::default());
    let notifier = Arc::new(InMemoryAlertNotifier::default());
    let service: DemoService = SurveySubmissionService::new(
        repository.clone(),
        notifier.clone(),
        LocalKeywordClassifier::default(),
        default_analysis_config(),
    );

    run_submission(
        &service,
        "Satisfied client",
        metadata("Distribuidora Aurora", "Marina Lopes"),
        vec![
            ("Nota geral", "9"),
            ("Como avalia o atendimento?", "Muito Satisfeito"),
            ("Você recomenda?", "Sim"),
            ("Comentário", "Treinamento excelente, didático e muito bom"),
        ],
    )
    .await;

    run_submission(
        &service,
        "Dissatisfied client",
        metadata("Engenharia Horizonte", "Rafael Costa"),
        vec![
            ("Nota geral", "3"),
            ("Teve dificuldade para acompanhar?", "Sim"),
            ("Comentário", "Achei tudo muito confuso e perdi tempo"),
        ],
    )
    .await;

    let events = notifier.events();
    if events.is_empty() {
        println!("\nDissatisfaction alerts: none dispatched");
    } else {
        println!("\nDissatisfaction alerts");
        for alert in &events {
            println!(
                "- {} ({}) via {} -> score {}, {}",
                alert.client_name,
                alert.product_type,
                alert.agent_name,
                alert.total_score,
                alert.reason.as_deref().unwrap_or("no rationale")
            );
        }
    }

    if args.skip_reprocess {
        return Ok(());
    }

    println!("\nReprocessing backlog demo");
    seed_unanalyzed_survey(&service, repository.as_ref());
    match service.reprocess_pending(10, Utc::now()).await {
        Ok(summary) => println!(
            "- reprocessed {} survey(s), {} alerted, {} skipped",
            summary.processed, summary.alerted, summary.skipped
        ),
        Err(err) => println!("- reprocessing unavailable: {err}"),
    }

    Ok(())
}

fn metadata(client_name: &str, agent_name: &str) -> SurveyMetadata {
    SurveyMetadata {
        client_code: format!("CLI-{:03}", client_name.len()),
        client_name: client_name.to_string(),
        product_type: "Treinamento".to_string(),
        agent_name: agent_name.to_string(),
        expires_at: Utc::now() + Duration::days(7),
    }
}

async fn run_submission(
    service: &DemoService,
    label: &str,
    metadata: SurveyMetadata,
    answers: Vec<(&str, &str)>,
) {
    println!("\n{label}");

    let record = match service.create_survey(metadata) {
        Ok(record) => record,
        Err(err) => {
            println!("  Survey creation failed: {err}");
            return;
        }
    };
    println!("  Survey link: /api/v1/surveys/{}", record.survey_id.0);

    let submission = SurveySubmission {
        answers: answers
            .into_iter()
            .map(|(question, value)| RawAnswer {
                question: question.to_string(),
                value: value.to_string(),
            })
            .collect(),
    };

    let updated = match service.submit(&record.survey_id, submission, Utc::now()).await {
        Ok(updated) => updated,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return;
        }
    };

    let view = updated.analysis_view();
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("  Analysis payload:\n{json}"),
        Err(err) => println!("  Analysis payload unavailable: {err}"),
    }
}

fn seed_unanalyzed_survey(service: &DemoService, repository: &InMemorySurveyRepository) {
    let record = match service.create_survey(metadata("Clínica Bem Estar", "Paula Reis")) {
        Ok(record) => record,
        Err(err) => {
            println!("- backlog seed failed: {err}");
            return;
        }
    };

    let answers: Vec<Answer> = [
        ("Nota geral", "2"),
        ("Comentário", "Material fraco e mal explicado"),
    ]
    .iter()
    .filter_map(|(question, value)| Answer::from_form(question, value))
    .collect();

    let backlog = SurveyRecord {
        status: SurveyStatus::Answered,
        answers,
        analysis: None,
        ..record
    };
    if let Err(err) = repository.update(backlog) {
        println!("- backlog seed failed: {err}");
    }
}
