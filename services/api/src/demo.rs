use crate::infra::{parse_timestamp, InMemoryInspectionRepository, JsonFileInspectionRepository};
use boiler_inspection::error::AppError;
use boiler_inspection::workflows::inspection::{
    ChecklistAnswer, DraftIntent, FormField, InspectionDraft, InspectionPatch, InspectionService,
    InspectionSubmission, PlainTextRenderer, RenderedReport, TechnicalAttribute,
};
use chrono::{DateTime, Utc};
use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference time for derived values (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Write the rendered report here instead of printing it.
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Submission JSON (the same body POST /api/v1/inspections accepts)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Reference time for derived values (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Directory for the rendered report; printed to stdout when omitted
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON-file store to read (see INSPECTION_STORE_PATH)
    #[arg(long)]
    pub(crate) store: PathBuf,
    /// CSV destination; printed to stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_inspection_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        now,
        out_dir,
    } = args;
    let now = now.unwrap_or_else(Utc::now);

    let raw = fs::read(&input)?;
    let submission: InspectionSubmission = serde_json::from_slice(&raw)?;

    let service = InspectionService::new(Arc::new(InMemoryInspectionRepository::default()));
    let inspection = service.submit(&submission, now)?;
    let rendered = service.render_report(inspection.id(), now, &PlainTextRenderer)?;
    emit_report(&rendered, out_dir.as_deref())
}

pub(crate) fn run_inspection_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs { store, output } = args;
    let repository = JsonFileInspectionRepository::open(store)?;
    let service = InspectionService::new(Arc::new(repository));

    let written = match output {
        Some(path) => {
            let file = fs::File::create(&path)?;
            let written = service.export_register(io::BufWriter::new(file))?;
            eprintln!("Wrote {written} inspections to {}", path.display());
            written
        }
        None => service.export_register(io::stdout().lock())?,
    };
    tracing::debug!(written, "register exported");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { now, out_dir } = args;
    let now = now.unwrap_or_else(Utc::now);
    let service = InspectionService::new(Arc::new(InMemoryInspectionRepository::default()));

    println!("Boiler inspection demo");
    println!("\nFilling in a draft");
    let mut draft = InspectionDraft::new();
    for intent in demo_intents(now) {
        println!("  - {}", describe(&intent));
        if let Err(err) = draft.apply(intent) {
            println!("    refused: {err}");
        }
    }

    let premature = InspectionDraft::new().commit(now);
    if let Err(err) = premature {
        println!("\nCommitting an empty draft is rejected:");
        for message in err.messages() {
            println!("  - {message}");
        }
    }

    let inspection = service.commit_draft(&draft, now)?;
    println!(
        "\nRecorded inspection {} | result {} | {} units | checklist {} | usage {}",
        inspection.id(),
        inspection.result().label(),
        inspection.total_installed(),
        inspection.checklist_completion(),
        inspection
            .usage_duration(now)
            .map(|duration| duration.to_string())
            .unwrap_or_else(|| "미입력".to_string())
    );

    let patch = InspectionPatch {
        summary: Some("배기통 접속부 재시공 후 재점검 예정".to_string()),
        ..InspectionPatch::default()
    };
    service.update(inspection.id(), &patch)?;
    println!("Summary updated after the site visit");

    let rendered = service.render_report(inspection.id(), now, &PlainTextRenderer)?;
    println!();
    emit_report(&rendered, out_dir.as_deref())?;

    println!("\nRegister export");
    service.export_register(io::stdout().lock())?;
    Ok(())
}

fn emit_report(rendered: &RenderedReport, out_dir: Option<&Path>) -> Result<(), AppError> {
    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(&rendered.filename);
            fs::write(&path, &rendered.bytes)?;
            println!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered.bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn demo_intents(now: DateTime<Utc>) -> Vec<DraftIntent> {
    let set = |field: FormField, value: &str| DraftIntent::SetField {
        field,
        value: value.to_string(),
    };

    let mut intents = vec![
        set(FormField::InspectionDate, &now.format("%Y-%m-%d").to_string()),
        set(FormField::Inspector, "김점검"),
        set(FormField::SiteName, "판교 테크노밸리 A동"),
        set(FormField::Region, "경기도"),
        set(FormField::SubRegion, "성남시"),
        set(FormField::Result, "주의"),
        set(FormField::FacilityManager, "박관리"),
        set(FormField::ContractorName, "한빛설비"),
        set(FormField::InstallationDate, "2022-03-15"),
        set(FormField::Technical(TechnicalAttribute::Fuel), "LNG"),
        set(
            FormField::Technical(TechnicalAttribute::ExhaustType),
            "FF (강제급배기)",
        ),
        set(FormField::Technical(TechnicalAttribute::Purpose), "상업용"),
        DraftIntent::AddProduct {
            product_id: "NFB-500".to_string(),
            count: 2,
        },
        DraftIntent::AddProduct {
            product_id: "NR-20".to_string(),
            count: 2,
        },
        DraftIntent::SetChecklistAnswer {
            item_id: "exhaust_pipe_joint".to_string(),
            answer: ChecklistAnswer::no("접속부 실리콘 마감 누락"),
        },
    ];
    intents.extend(
        ["install_location", "gas_pipe_connection", "ignition_test", "flame_state"]
            .into_iter()
            .map(|item_id| DraftIntent::SetChecklistAnswer {
                item_id: item_id.to_string(),
                answer: ChecklistAnswer::yes(),
            }),
    );
    intents.extend(std::iter::repeat(DraftIntent::AttachPhoto).take(6));
    intents
}

fn describe(intent: &DraftIntent) -> String {
    match intent {
        DraftIntent::SetField { field, value } => format!("set {field:?} = {value}"),
        DraftIntent::ClearField { field } => format!("clear {field:?}"),
        DraftIntent::AddProduct { product_id, count } => format!("add {count} x {product_id}"),
        DraftIntent::SetProductCount { index, count } => {
            format!("set product #{index} count to {count}")
        }
        DraftIntent::RemoveProduct { index } => format!("remove product #{index}"),
        DraftIntent::SetChecklistAnswer { item_id, answer } => {
            format!("checklist {item_id}: {}", answer.decision.symbol())
        }
        DraftIntent::AttachPhoto => "attach photo".to_string(),
        DraftIntent::DetachPhoto => "detach photo".to_string(),
    }
}
