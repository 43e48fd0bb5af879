#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::info;

use reliability_harness::{
    agreement_summary, analyze_reliability, build_report, cohens_kappa, find_optimal_subset,
    krippendorff_alpha, load_config_from_path, percent_agreement, recode_reversed,
    render_report_markdown, AgreementInput, EngineConfig, OptimalSubset, ReliabilityResult,
    ResponseMatrix, ScaleAnalysis, SearchStrategy,
};

#[derive(Parser)]
#[command(name = "reliability", version, about = "Inter-coder agreement and scale reliability")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inter-coder agreement from a JSON {documents, coders} file
    Agreement {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = MetricArg::All)]
        metric: MetricArg,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Cronbach's Alpha and item diagnostics from a JSON {item_ids, rows} file
    Scale {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Select the item subset of a given size with the highest alpha
    Optimize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        target: usize,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Render agreement/scale/optimize outputs as Markdown
    Report {
        #[arg(long)]
        agreement: Option<PathBuf>,
        #[arg(long)]
        scale: Option<PathBuf>,
        #[arg(long)]
        optimize: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Percent,
    Kappa,
    Alpha,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Greedy,
    Exhaustive,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => SearchStrategy::Greedy,
            StrategyArg::Exhaustive => SearchStrategy::Exhaustive,
        }
    }
}

/// Scale input: a response matrix plus optional reverse-scored items.
#[derive(Deserialize)]
struct ScaleInput {
    item_ids: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    reversed: Vec<String>,
    /// `[min, max]` of the rating scale, required when `reversed` is set.
    #[serde(default)]
    scale_bounds: Option<[f64; 2]>,
}

impl ScaleInput {
    fn into_matrix(self) -> Result<ResponseMatrix, Box<dyn std::error::Error>> {
        let matrix = ResponseMatrix::new(self.item_ids, self.rows)?;
        if self.reversed.is_empty() {
            return Ok(matrix);
        }
        let [min, max] = self
            .scale_bounds
            .ok_or("`reversed` items require `scale_bounds`")?;
        Ok(recode_reversed(&matrix, &self.reversed, min, max)?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Agreement {
            input,
            metric,
            config,
            out,
        } => {
            let cfg = load_config(config)?.agreement;
            let data: AgreementInput = read_json(&input)?;
            let (coders, docs) = (&data.coders, &data.documents);
            let results: Vec<ReliabilityResult> = match metric {
                MetricArg::Percent => vec![percent_agreement(coders, docs, &cfg)?],
                MetricArg::Kappa => vec![cohens_kappa(coders, docs, &cfg)?],
                MetricArg::Alpha => vec![krippendorff_alpha(coders, docs, &cfg)?],
                MetricArg::All => {
                    let summary = agreement_summary(coders, docs, &cfg)?;
                    vec![
                        summary.percent_agreement,
                        summary.cohens_kappa,
                        summary.krippendorff_alpha,
                    ]
                }
            };
            for result in &results {
                info!(
                    metric = result.metric.label(),
                    value = result.value,
                    interpretation = %result.interpretation,
                    "agreement computed"
                );
            }
            write_json(&out, &results)?;
        }
        Commands::Scale { input, config, out } => {
            let cfg = load_config(config)?.scale;
            let matrix = read_json::<ScaleInput>(&input)?.into_matrix()?;
            let analysis = analyze_reliability(&matrix, matrix.item_ids(), &cfg)?;
            info!(
                alpha = analysis.cronbach_alpha,
                band = %analysis.label,
                "scale analyzed"
            );
            write_json(&out, &analysis)?;
        }
        Commands::Optimize {
            input,
            target,
            strategy,
            config,
            out,
        } => {
            let mut cfg = load_config(config)?.scale;
            if let Some(strategy) = strategy {
                cfg.strategy = strategy.into();
            }
            let matrix = read_json::<ScaleInput>(&input)?.into_matrix()?;
            let subset = find_optimal_subset(&matrix, matrix.item_ids(), target, &cfg)?;
            info!(
                kept = subset.item_ids.len(),
                alpha = subset.alpha,
                original_alpha = subset.original_alpha,
                "scale optimized"
            );
            write_json(&out, &subset)?;
        }
        Commands::Report {
            agreement,
            scale,
            optimize,
            out,
        } => {
            if agreement.is_none() && scale.is_none() && optimize.is_none() {
                return Err("report requires --agreement, --scale and/or --optimize".into());
            }
            let agreement: Vec<ReliabilityResult> = match agreement {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let scale: Option<ScaleAnalysis> = scale.map(|p| read_json(&p)).transpose()?;
            let subset: Option<OptimalSubset> = optimize.map(|p| read_json(&p)).transpose()?;
            let report = build_report(agreement, scale, subset);
            std::fs::write(&out, render_report_markdown(&report))?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &PathBuf,
) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<(), std::io::Error> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
