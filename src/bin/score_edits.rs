use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use chrono::Local;
use clap::Parser;
use log::{info, LevelFilter};
use m2score::{
    ScorerConfig,
    Result,
    M2Scorer,
    corpus::{self, ScoreSummary},
};

/// Scores grammatical error correction output against gold edits.
#[derive(Parser, Debug)]
#[command(name = "score_edits", version)]
struct Args {
    /// JSON Lines file, one {source, hypothesis, gold} record per line
    #[arg(short, long)]
    input: PathBuf,

    /// INI configuration file
    config: Option<PathBuf>,

    /// Maximum unchanged words a merged edit may contain
    #[arg(long)]
    max_unchanged_words: Option<usize>,

    /// Ignore edits that only change whitespace or casing
    #[arg(long)]
    ignore_whitespace_casing: bool,

    /// Pick the best annotator per sentence instead of the first one
    #[arg(long)]
    multi_reference: bool,

    /// Print the per-sentence edit blocks
    #[arg(short, long)]
    verbose: bool,

    /// Log the distance matrix, graph and path of every sentence
    #[arg(long)]
    very_verbose: bool,

    /// Write per-sentence counts and scores to this CSV file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Worker threads; 1 disables parallel scoring
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    /// Loads the configuration file if given and applies command line overrides.
    fn load_config(&self) -> Result<ScorerConfig> {
        let mut config = match &self.config {
            Some(path) => ScorerConfig::from_ini(path)?,
            None => ScorerConfig::default(),
        };

        if let Some(words) = self.max_unchanged_words {
            config.alignment.max_unchanged_words = words;
        }
        if self.ignore_whitespace_casing {
            config.scoring.ignore_whitespace_casing = true;
        }
        if self.verbose {
            config.scoring.verbose = true;
        }
        if self.very_verbose {
            config.scoring.very_verbose = true;
        }
        if let Some(threads) = self.threads {
            config.processor.thread_count = threads.max(1);
            config.processor.use_parallel = threads > 1;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(config: &ScorerConfig) -> Result<()> {
    let level = if config.scoring.very_verbose {
        LevelFilter::Trace
    } else {
        config.processor.get_log_level()
    };

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);

    if let Some(dir) = &config.files.log_dir {
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("score_edits_{}.log", timestamp)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    init_logging(&config)?;

    let start_time = Instant::now();
    info!("Starting scoring of {:?} with max_unchanged_words={}", args.input, config.alignment.max_unchanged_words);

    let batch = corpus::load_records(&args.input)?;
    let scorer = M2Scorer::new(config);

    let report = if args.multi_reference {
        scorer.batch_multi_scores(&batch.sources, &batch.hypotheses, &batch.golds)?
    } else {
        let golds = batch.single_reference_golds();
        scorer.batch_scores(&batch.sources, &batch.hypotheses, &golds)?
    };

    if scorer.config().scoring.verbose {
        for sentence in &report.sentences {
            println!("{}", sentence);
        }
        println!("CORRECT EDITS  : {}", report.counts.correct);
        println!("PROPOSED EDITS : {}", report.counts.proposed);
        println!("GOLD EDITS     : {}", report.counts.gold);
    }

    if let Some(path) = &args.report {
        corpus::save_sentence_report(path, &report)?;
        info!("Wrote per-sentence report to {:?}", path);
    }

    if args.json {
        let summary = ScoreSummary::new(&report, batch.skipped);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report);
    }

    info!("Scored {} sentences in {:.2?}", report.sentences.len(), start_time.elapsed());
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("score_edits: {}", e);
        std::process::exit(1);
    }
}
