use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use iadem::evaluation::{CurveFormat, Snapshot};
use iadem::tasks::PrequentialEvaluator;
use iadem::ui::cli::args::{Cli, Command};
use iadem::ui::types::build::{build_evaluator, build_learner, build_stream};
use iadem::ui::types::choices::{DumpFormat, TaskChoice};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_GREY: &str = "\x1b[90m";

fn init_logging() {
    let filter = EnvFilter::try_from_env("IADEM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let task: TaskChoice = match cli.command {
        Command::Run(args) => args.into_task_choice()?,
        Command::Schema(args) => {
            println!("{}", args.render()?);
            return Ok(());
        }
    };

    let render: JoinHandle<()>;
    let dump_path: Option<PathBuf>;
    let dump_format: DumpFormat;

    let mut runner = match task {
        TaskChoice::EvaluatePrequential(p) => {
            let max_instances = p.max_instances;
            let max_seconds = p.max_seconds;
            let sample_freq = p.sample_frequency;
            dump_path = p.dump_file;
            dump_format = p.dump_format;

            let header: Vec<String> = vec![
                format!("{BOLD}{FG_CYAN}▶ Prequential Evaluation{RESET}"),
                format!(
                    "{DIM}sample_freq={sample_freq}{RESET}  {}",
                    timestamp_now()
                ),
                format!(
                    "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
                ),
            ];

            let stream = build_stream(p.stream).context("failed to build stream")?;
            let evaluator = build_evaluator(stream.as_ref());
            let learner = build_learner(p.learner).context("failed to build learner")?;
            info!(sample_freq, ?max_instances, ?max_seconds, "starting prequential run");

            let (tx, rx) = std::sync::mpsc::channel();
            render = std::thread::spawn(move || {
                render_status_with_header(rx, header, 150, max_instances, max_seconds)
            });

            PrequentialEvaluator::new(
                learner,
                stream,
                evaluator,
                max_instances,
                max_seconds,
                sample_freq,
            )
            .context("failed to construct PrequentialEvaluator")?
            .with_progress(tx)
        }
    };

    runner.run().context("runner failed")?;
    info!(processed = runner.processed(), "run finished");

    if let Some(path) = dump_path
        && !path.as_os_str().is_empty()
    {
        runner
            .curve()
            .export(&path, CurveFormat::from(dump_format))
            .with_context(|| format!("failed to export snapshots to {}", path.display()))?;
    }

    drop(runner);
    let _ = render.join();

    Ok(())
}

/// Prints the header once, then keeps one status line refreshed until the
/// sender hangs up.
fn render_status_with_header(
    rx: Receiver<Snapshot>,
    header_lines: Vec<String>,
    repaint_every_ms: u64,
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
) {
    for line in &header_lines {
        println!("{line}");
    }
    println!();
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut last_snap: Option<Snapshot> = None;

    loop {
        match rx.recv_timeout(tick) {
            Ok(s) => last_snap = Some(s),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(s) = last_snap.take() {
                    print!("\r{}\x1B[K\n", format_status(&s, max_instances, max_seconds));
                    let _ = io::stdout().flush();
                }
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            if let Some(s) = last_snap.as_ref() {
                print!("\r{}\x1B[K", format_status(s, max_instances, max_seconds));
                let _ = io::stdout().flush();
            }
            last_draw = Instant::now();
        }
    }
}

fn format_status(s: &Snapshot, max_instances: Option<u64>, max_seconds: Option<u64>) -> String {
    let seen = s.instances_seen;
    let acc = fmtf(s.accuracy * 100.0, 4);
    let kappa = fmtf(s.kappa * 100.0, 4);

    let mut model = String::new();
    for key in ["nodes", "leaves", "interchanged_trees", "pruned_subtrees"] {
        if let Some(v) = s.extras.get(key) {
            model.push_str(&format!("  {DIM}{key}{RESET} {v}"));
        }
    }

    let mut line = format!(
        "{FG_GREEN}{BOLD}seen{RESET} {seen:>9}  \
         {FG_CYAN}{BOLD}acc{RESET} {acc:>7}% \
         {FG_MAGENTA}{BOLD}κ{RESET} {kappa:>7}%\
         {model}  \
         {DIM}t{RESET} {:>7.3}s",
        s.seconds
    );

    let bar_w = 15usize;
    if let Some(mi) = max_instances {
        line.push_str(&format!(
            "  {DIM}[inst]{RESET} {}",
            progress_bar(seen as f64, mi as f64, bar_w)
        ));
    }
    if let Some(ms) = max_seconds {
        line.push_str(&format!(
            "  {DIM}[time]{RESET} {}",
            progress_bar(s.seconds, ms as f64, bar_w)
        ));
    }

    line
}

fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if total.is_finite() && total > 0.0 {
        let ratio = (current / total).clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        let empty = width.saturating_sub(filled);
        return format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(empty),
            ratio * 100.0
        );
    }
    String::new()
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{x:.prec$}")
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    format!(
        "{DIM}{}{RESET}",
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
