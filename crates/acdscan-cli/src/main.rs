//! acdscan CLI — command-line interface for anterior-chamber depth risk estimation.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use acdscan::{
    acd_for_score, classify, feature_points, AnalyzeConfig, AnalyzeService, EyeAnalyzer,
    EyeSide, FeatureVector, FixedLandmarks, PupilMethod, ACD_BY_SCORE, ECCENTRICITY_POINTS,
    FALLBACK_PENALTY, NORMAL_ACD_MM, RATIO_POINTS, SIZE_POINTS,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "acdscan")]
#[command(about = "Estimate anterior-chamber depth risk from iris and pupil geometry")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one eye in an image.
    Analyze(CliAnalyzeArgs),

    /// Run only the risk classifier on given feature values.
    Classify(CliClassifyArgs),

    /// Print the health probe response.
    Health,

    /// Print the default analysis configuration (JSON).
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image (PNG or JPEG).
    #[arg(long)]
    image: PathBuf,

    /// Landmark JSON: {"right": [[x, y] x5], "left": [[x, y] x5]}, either side optional.
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Analyze the left eye instead of the right one.
    #[arg(long)]
    left: bool,

    /// Analysis config JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the response (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliClassifyArgs {
    /// Pupil/iris diameter ratio.
    #[arg(long)]
    ratio: f64,

    /// Pupil center offset in iris radii.
    #[arg(long)]
    eccentricity: f64,

    /// Normalized pupil size (pupil/iris radius squared).
    #[arg(long)]
    size: f64,

    /// Treat the pupil as estimated by the geometric fallback.
    #[arg(long)]
    fallback: bool,

    /// Print the prediction as JSON instead of a breakdown.
    #[arg(long)]
    json: bool,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Health => run_health(),
        Commands::DefaultConfig => run_default_config(),
    }
}

fn load_landmarks(path: Option<&Path>) -> CliResult<FixedLandmarks> {
    match path {
        Some(path) => FixedLandmarks::from_json_file(path).map_err(|e| -> CliError {
            format!("Failed to load landmarks {}: {}", path.display(), e).into()
        }),
        None => Ok(FixedLandmarks::default()),
    }
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let bytes = std::fs::read(&args.image).map_err(|e| -> CliError {
        format!("Failed to read image {}: {}", args.image.display(), e).into()
    })?;

    let config = match &args.config {
        Some(path) => AnalyzeConfig::from_json_file(path).map_err(|e| -> CliError {
            format!("Failed to load config {}: {}", path.display(), e).into()
        })?,
        None => AnalyzeConfig::default(),
    };
    let landmarks = load_landmarks(args.landmarks.as_deref())?;
    if args.landmarks.is_none() {
        tracing::warn!("No --landmarks given; analysis will report no face");
    }

    let eye = EyeSide::from_prefer_right(!args.left);
    let mut service = AnalyzeService::new(EyeAnalyzer::with_config(config), landmarks);
    let response = service.analyze_encoded(&bytes, eye);

    match response.result() {
        Some(res) => tracing::info!(
            "{} eye: ACD {:.1} mm, {} risk (score {}, confidence {:.2}, pupil {})",
            eye,
            res.prediction.acd_mm,
            res.prediction.risk_level,
            res.prediction.risk_score,
            res.prediction.confidence,
            res.pupil.method,
        ),
        None => tracing::info!("{} eye: no prediction", eye),
    }

    let json = serde_json::to_string_pretty(&response)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            tracing::info!("Results written to {}", out.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ── classify ───────────────────────────────────────────────────────────

fn run_classify(args: &CliClassifyArgs) -> CliResult<()> {
    let features = FeatureVector::from_scores(args.ratio, args.eccentricity, args.size);
    let method = if args.fallback {
        PupilMethod::Fallback
    } else {
        PupilMethod::Segmented
    };
    let prediction = classify(&features, method);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let [ratio_pts, ecc_pts, size_pts] = feature_points(&features);
    println!("Feature points:");
    println!(
        "  iris_pupil_ratio       {:.3}  +{}  (below: {})",
        features.iris_pupil_ratio,
        ratio_pts,
        format_table(&RATIO_POINTS)
    );
    println!(
        "  pupil_eccentricity     {:.3}  +{}  (above: {})",
        features.pupil_eccentricity,
        ecc_pts,
        format_table(&ECCENTRICITY_POINTS)
    );
    println!(
        "  normalized_pupil_size  {:.3}  +{}  (below: {})",
        features.normalized_pupil_size,
        size_pts,
        format_table(&SIZE_POINTS)
    );
    if args.fallback {
        println!("  fallback penalty              -{}", FALLBACK_PENALTY);
    }
    println!("Risk score:   {}", prediction.risk_score);
    println!(
        "ACD:          {:.1} mm  (score table: {}, else {:.1})",
        acd_for_score(prediction.risk_score),
        ACD_BY_SCORE
            .iter()
            .map(|(score, acd)| format!(">={}→{:.1}", score, acd))
            .collect::<Vec<_>>()
            .join(", "),
        NORMAL_ACD_MM
    );
    println!("Risk level:   {}", prediction.risk_level);
    println!("Confidence:   {:.2}", prediction.confidence);
    println!("Quality:      {:?}", prediction.detection_quality);
    println!();
    println!("{}", prediction.recommendation);
    Ok(())
}

fn format_table(table: &[(f64, u32)]) -> String {
    table
        .iter()
        .map(|(bound, points)| format!("{:.2}→{}", bound, points))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── health / default-config ────────────────────────────────────────────

fn run_health() -> CliResult<()> {
    let service = AnalyzeService::new(EyeAnalyzer::new(), FixedLandmarks::default());
    println!("{}", serde_json::to_string_pretty(&service.health())?);
    Ok(())
}

fn run_default_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&AnalyzeConfig::default())?;
    println!("{}", json);
    Ok(())
}
