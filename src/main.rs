use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stenogram::{
    build_paragraphs, compute_metrics, ensure_job_dirs, extract_keywords, parse_asr_file,
    run_pipeline,
    stages::diarize::{needs_pseudo_diarization, pseudo_diarize},
    HeuristicEstimator, LlmConfig, OpenAiClient, PipelineConfig,
};
use stenogram::models::PipelineRequest;

#[derive(Parser)]
#[command(name = "stenogram")]
#[command(author, version, about = "Meeting transcript post-processing pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an ASR document into transcript, summary, subtitles and minutes
    Process {
        /// Input ASR file (WhisperX-style JSON with aligned segments)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the artifacts
        /// (defaults to <DATA_DIR>/uploads/<JOB_ID>/out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data root used when --output is omitted
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Job identifier (random UUID when omitted)
        #[arg(long)]
        job_id: Option<String>,

        /// Override the ASR-detected language
        #[arg(long)]
        language: Option<String>,

        /// Audio duration in seconds, when known upstream
        #[arg(long)]
        duration_sec: Option<f64>,

        /// Force the pause-heuristic speaker labeling
        #[arg(long)]
        fast_mode: bool,

        /// Pause threshold in seconds
        #[arg(long, default_value = "0.5")]
        pause_threshold: f64,

        /// Maximum characters per caption line
        #[arg(long, default_value = "55")]
        caption_max_chars: usize,

        /// Character cap for the minutes document
        #[arg(long, default_value = "30000")]
        minutes_max_chars: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an ASR document without summarizing or writing artifacts
    Analyze {
        /// Input ASR file (WhisperX-style JSON with aligned segments)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            data_dir,
            job_id,
            language,
            duration_sec,
            fast_mode,
            pause_threshold,
            caption_max_chars,
            minutes_max_chars,
            verbose,
        } => {
            setup_logging(verbose);
            let config = PipelineConfig {
                pause_threshold_sec: pause_threshold,
                caption_max_chars,
                minutes_max_chars,
                fast_mode,
                llm: LlmConfig::from_env(),
                ..Default::default()
            };
            let job_id = job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let out_dir = match output {
                Some(dir) => dir,
                None => ensure_job_dirs(&data_dir, &job_id)?.out_dir,
            };
            let request = PipelineRequest {
                job_id,
                asr_path: input,
                out_dir,
                language,
                duration_sec,
            };
            process(request, config).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process(request: PipelineRequest, config: PipelineConfig) -> Result<()> {
    info!("Processing job {} from {:?}", request.job_id, request.asr_path);

    let backend = OpenAiClient::new(config.llm.clone());
    let result = run_pipeline(&request, &config, &backend, &HeuristicEstimator).await?;

    info!(
        "Complete: {} speakers, {:.1}s, {} wpm, {} pauses ({:?} diarization)",
        result.speakers.len(),
        result.duration_sec,
        result.metrics.speech_rate_wpm,
        result.metrics.pauses_count,
        result.diarization
    );
    if result.summary_repairs > 0 || result.summary_schema_fallbacks > 0 {
        info!(
            "Summary degraded: {} repairs, {} schema fallbacks",
            result.summary_repairs, result.summary_schema_fallbacks
        );
    }
    for (name, path) in &result.out {
        info!("Artifact {}: {:?}", name, path);
    }
    Ok(())
}

fn analyze(input: PathBuf) -> Result<()> {
    info!("Analyzing ASR document {:?}", input);
    let config = PipelineConfig::default();
    let doc = parse_asr_file(&input)?;
    let duration = doc.effective_duration();
    let language = doc.language.clone();
    let mut segments = doc.segments;

    let pseudo = needs_pseudo_diarization(&segments, false);
    if pseudo {
        pseudo_diarize(&mut segments, &config);
    }

    let paragraphs = build_paragraphs(&segments, &config);
    let metrics = compute_metrics(&paragraphs, &config);
    let keywords = extract_keywords(&paragraphs, config.keyword_top_k);

    println!("ASR Document Analysis");
    println!("=====================");
    println!("Language: {}", language.as_deref().unwrap_or("unknown"));
    println!("Segments: {}", segments.len());
    println!("Paragraphs: {}", paragraphs.len());
    println!("Duration: {:.1}s", duration);
    println!("Diarization: {}", if pseudo { "pseudo (pause heuristic)" } else { "upstream" });
    println!();

    println!("Metrics");
    println!("-------");
    println!("Speech rate: {} wpm", metrics.speech_rate_wpm);
    println!("Pauses: {}", metrics.pauses_count);
    for (speaker, share) in &metrics.talk_time {
        println!("{}: {:.0}% of talk time", speaker, share * 100.0);
    }
    println!();

    println!("Top keywords: {}", keywords.join(", "));
    Ok(())
}
