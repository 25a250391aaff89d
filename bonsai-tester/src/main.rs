mod common;
mod logic;

use anyhow::{Context, Result};
use bonsai_game::EngineConfig;
use bonsai_game::constants::DEFAULT_TICK_MILLIS;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use common::scenario::{PolicySetup, expand_scenarios, get_scenario, list_scenarios};
use common::{read_config_file, split_csv};
use logic::live::{LiveOptions, print_live_summary, run_live};
use logic::{GameplayStrategy, LogicTester, ScenarioResult, resolve_seed_inputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "bonsai-tester", version)]
#[command(about = "Automated QA harness for the bonsai cutting game")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every built-in one)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers or `a..b` ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Tick cap per run; overrides every scenario's own cap
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Player policy for the `policy` scenario and live runs
    #[arg(long, value_enum, default_value_t = GameplayStrategy::Diligent)]
    policy: GameplayStrategy,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON engine configuration for the `policy` scenario and live runs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play each seed in real time instead of running scenarios
    #[arg(long)]
    live: bool,

    /// Tick period in milliseconds for live runs
    #[arg(long, default_value_t = DEFAULT_TICK_MILLIS)]
    tick_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let engine = load_engine_config(&args)?;

    if args.live {
        return run_live_sessions(&args, &seeds, engine).await;
    }

    let setup = PolicySetup {
        strategy: args.policy,
        engine,
        max_ticks: args.max_ticks,
    };
    let scenarios = expand_scenarios(split_csv(&args.scenarios));
    let all_results = run_logic_scenarios(&args, &scenarios, &seeds, &setup);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🌱 Bonsai Automated Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn load_engine_config(args: &Args) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => {
            let cfg = read_config_file(path)?;
            log::info!("loaded engine config from {}: {cfg:?}", path.display());
            Ok(cfg)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    setup: &PolicySetup,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name, setup) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

async fn run_live_sessions(args: &Args, seeds: &[u64], engine: EngineConfig) -> Result<()> {
    println!("{}", "⏱️  Running Live Sessions".bright_blue().bold());
    println!("{}", "-".repeat(30).blue());

    for &seed in seeds {
        let options = LiveOptions {
            seed,
            strategy: args.policy,
            engine,
            tick: Duration::from_millis(args.tick_ms.max(1)),
            max_ticks: args.max_ticks.unwrap_or(u64::MAX),
            verbose: args.verbose,
        };
        let summary = run_live(options)
            .await
            .with_context(|| format!("live run for seed {seed}"))?;
        print_live_summary(seed, args.policy, &summary);
    }
    Ok(())
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Bonsai Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
