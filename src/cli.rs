// src/cli.rs
//
// Command-line front end. One process = one capture cycle: trigger, replay
// the HAR traffic into the watchers, trigger again.

use std::{io::Write, path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, WrapErr};

use crate::{
    attendance::{AttendanceApi, HttpApi},
    capture::{har, StaticGrant},
    config::{self, options::{AppOptions, RowOrder}},
    core::{derive_origin_key, origin::parse_page_url},
    file,
    progress::Progress,
    scan::{ScanOutcome, Scanner},
    sink::{OutputSink, SinkError},
};

#[derive(Parser, Debug)]
#[command(name = "cli", version, about = "Export course attendance as CSV")]
pub struct Cli {
    /// Options file (TOML). Missing file → defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mirror the debug log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture credentials from HAR traffic and export attendance
    Scan(ScanArgs),
    /// Print the origin key for a page URL
    Origin {
        #[arg(long)]
        url: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Completion,
    Schedule,
}

impl From<OrderArg> for RowOrder {
    fn from(o: OrderArg) -> Self {
        match o {
            OrderArg::Completion => RowOrder::Completion,
            OrderArg::Schedule => RowOrder::Schedule,
        }
    }
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// URL of the course page in the target application
    #[arg(long)]
    url: String,

    /// HAR capture(s) of that page's traffic, replayed in order
    #[arg(long = "har")]
    har: Vec<PathBuf>,

    /// Grant traffic observation for the page's origin
    #[arg(long)]
    allow: bool,

    /// Also write the CSV to this file (or directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, conflicts_with = "no_timeout")]
    timeout: Option<u64>,

    /// Wait on requests indefinitely
    #[arg(long)]
    no_timeout: bool,

    /// Row order of the table
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
}

impl ScanArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(secs) = self.timeout {
            opts.fetch.request_timeout_secs = secs;
        }
        if self.no_timeout {
            opts.fetch.request_timeout_secs = 0;
        }
        if let Some(order) = self.order {
            opts.fetch.row_order = order.into();
        }
        if self.out.is_some() {
            opts.export.out_path = self.out.clone();
        }
    }
}

/// stdout for display, export file as the "copy".
struct StdoutSink {
    out_path: Option<PathBuf>,
}

impl OutputSink for StdoutSink {
    fn show(&mut self, csv: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(csv.as_bytes());
        let _ = stdout.flush();
    }

    fn copy(&mut self, csv: &str) -> Result<(), SinkError> {
        let Some(target) = &self.out_path else { return Ok(()) };
        let path = file::write_export(target, csv)
            .map_err(|source| SinkError::Io { path: target.clone(), source })?;
        eprintln!("Wrote {}", path.display());
        Ok(())
    }
}

struct CliProgress {
    done: usize,
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Fetching {total} past session(s)…");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        eprintln!("  [{}/{}] {}", self.done, self.total, label);
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    crate::logging::init(
        None,
        if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info },
        cli.verbose,
    );

    let config_path = cli.config.clone().unwrap_or_else(config::file::default_path);
    let mut opts = config::file::load(&config_path)?;

    match cli.command {
        Command::Origin { url } => {
            let page = parse_page_url(&url)?;
            println!("{}", derive_origin_key(&page)?);
            Ok(())
        }
        Command::Scan(args) => {
            args.apply(&mut opts);
            scan(&args, &opts)
        }
    }
}

fn scan(args: &ScanArgs, opts: &AppOptions) -> color_eyre::Result<()> {
    let page = parse_page_url(&args.url)?;
    let mut scanner = Scanner::new(&opts.capture);
    let mut grant = StaticGrant(args.allow);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("starting async runtime")?;
    let api: Arc<dyn AttendanceApi> = Arc::new(HttpApi::new(&opts.fetch)?);
    let mut sink = StdoutSink { out_path: opts.export.out_path.clone() };

    for round in 0..2 {
        let mut progress = CliProgress { done: 0, total: 0 };
        let outcome = rt.block_on(scanner.run(
            &page,
            &mut grant,
            api.clone(),
            &opts.fetch,
            chrono::Utc::now(),
            &mut sink,
            Some(&mut progress as &mut dyn Progress),
        ))?;

        match outcome {
            ScanOutcome::Exported(report) => {
                eprintln!(
                    "{} session(s) × {} student(s), {} not yet ended",
                    report.sessions, report.students, report.skipped
                );
                return Ok(());
            }
            ScanOutcome::CaptureStarted { origin, missing } if round == 0 => {
                logf!("CLI: capturing on {origin}, missing {missing:?}");
                if args.har.is_empty() {
                    bail!("capture armed for {origin} but no --har traffic given (missing {})", missing.join(", "));
                }
                for path in &args.har {
                    let har = har::load(path)?;
                    let obs = scanner.observe_all(har.events().iter());
                    eprintln!("Replayed {} ({} watcher(s) fired)", path.display(), obs.fired.len());
                }
            }
            ScanOutcome::CaptureStarted { origin, missing } => {
                return Err(eyre!(
                    "capture incomplete for {origin}: traffic never showed {}",
                    missing.join(", ")
                ));
            }
        }
    }
    Ok(())
}
