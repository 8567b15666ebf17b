use crate::infra::build_screening_service;
use clap::Args;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::workflows::screening::{CandidateId, ResultBundle, SourceStatus};
use std::fmt::Write as _;

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyzeArgs {
    /// Candidate id to report a standing for (e.g. DS07)
    #[arg(long)]
    pub(crate) candidate_id: Option<String>,
    /// Override the number of top-ranked candidates used by the bias audit
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub(crate) top_n: Option<usize>,
    /// Skip the remote candidate source and analyze local records only
    #[arg(long)]
    pub(crate) offline: bool,
    /// Print the raw result bundle as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct NextIdArgs {
    /// Skip the remote candidate source when allocating
    #[arg(long)]
    pub(crate) offline: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        candidate_id,
        top_n,
        offline,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(top_n) = top_n {
        config.screening.audit_top_n = top_n;
    }

    let service = build_screening_service(&config.screening, offline);
    let query = candidate_id.map(|id| CandidateId(id.trim().to_string()));
    let bundle = service.analyze(query.as_ref())?;

    if json {
        let rendered = serde_json::to_string_pretty(&bundle).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!(
            "{}",
            render_analysis(&bundle, query.as_ref(), config.screening.audit_top_n)
        );
    }

    Ok(())
}

pub(crate) fn run_next_id(args: NextIdArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_screening_service(&config.screening, args.offline);
    println!("{}", service.next_id()?);
    Ok(())
}

fn describe_source(status: &SourceStatus) -> String {
    match status {
        SourceStatus::Loaded { records } => format!("loaded ({records} records)"),
        SourceStatus::Unavailable { reason } => format!("unavailable ({reason})"),
        SourceStatus::Disabled => "disabled".to_string(),
    }
}

pub(crate) fn render_analysis(
    bundle: &ResultBundle,
    query: Option<&CandidateId>,
    top_n: usize,
) -> String {
    let mut out = String::new();
    let best = &bundle.best_candidate;

    writeln!(out, "Candidate screening report").expect("write report line");
    writeln!(
        out,
        "- Sources: remote {} | local {}",
        describe_source(&bundle.sources.remote),
        describe_source(&bundle.sources.local)
    )
    .expect("write report line");
    writeln!(
        out,
        "- Best candidate: {} {} (score {:.4})",
        best.id, best.display_name, best.score
    )
    .expect("write report line");

    if let Some(id) = query {
        let standing = &bundle.current_candidate;
        if standing.is_found() {
            writeln!(
                out,
                "- Candidate {id}: rank {} | score {:.4} | best: {}",
                standing.rank,
                standing.score,
                if standing.is_best { "yes" } else { "no" }
            )
            .expect("write report line");
        } else {
            writeln!(out, "- Candidate {id}: not in the pool").expect("write report line");
        }
    }

    writeln!(out, "\nTop-{top_n} representation audit").expect("write report line");
    if bundle.bias_summary.is_empty() {
        writeln!(out, "  (no protected attributes in the sources)").expect("write report line");
    }
    for (attribute, shares) in &bundle.bias_summary {
        writeln!(out, "  {}", attribute.label()).expect("write report line");
        for share in shares {
            writeln!(
                out,
                "    - {}: population {:.2}% | top {:.2}% | difference {:+.2}",
                share.category, share.population_pct, share.top_pct, share.difference
            )
            .expect("write report line");
        }
    }

    out
}
