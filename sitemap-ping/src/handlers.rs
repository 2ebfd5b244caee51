use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use sitemap_ping_core::config::{normalize_sitemap_path, resolve_site_url};
use sitemap_ping_core::{Environment, Hook, HookInputs, HookOptions, RunReport};
use sitemap_ping_notifier::FanOut;
use sitemap_ping_notifier::client::DEFAULT_TIMEOUT_SECS;
use std::future::Future;
use std::io::IsTerminal;
use tracing::{Level, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::WARN,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Everything `ping` needs, pulled out of the command line.
#[derive(Debug, Clone)]
pub struct PingArgs {
    pub inputs: HookInputs,
    pub options: HookOptions,
    pub format: ReportFormat,
}

pub fn parse_ping_args(args: &ArgMatches) -> PingArgs {
    let inputs = HookInputs {
        site_url: args.get_one::<String>("site-url").cloned(),
        sitemap_path: args.get_one::<String>("sitemap-path").cloned(),
        publish_dir: args.get_one::<String>("publish-dir").cloned(),
    };

    let options = HookOptions {
        timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(DEFAULT_TIMEOUT_SECS),
        fan_out: if args.get_flag("concurrent") {
            FanOut::Concurrent
        } else {
            FanOut::Sequential
        },
        include_default_targets: !args.get_flag("no-default-targets"),
        extra_targets: extra_targets(args),
        dry_run: args.get_flag("dry-run"),
    };

    let format = match args.get_one::<String>("format").map(String::as_str) {
        Some("json") => ReportFormat::Json,
        _ => ReportFormat::Text,
    };

    PingArgs {
        inputs,
        options,
        format,
    }
}

fn extra_targets(args: &ArgMatches) -> Vec<String> {
    args.get_many::<String>("target")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Install the stdout log subscriber. JSON output keeps stdout for the
/// report, so logs move to stderr in that mode.
pub fn init_tracing(verbosity: Verbosity, format: ReportFormat) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(verbosity.level())
        .with_target(false);

    let builder = builder.with_ansi(log_colors(format));
    let installed = match format {
        ReportFormat::Text => builder.with_writer(std::io::stdout).try_init(),
        ReportFormat::Json => builder.with_writer(std::io::stderr).try_init(),
    };
    if installed.is_err() {
        eprintln!("Logging was already initialised");
    }
}

/// Color log lines only when their stream is a terminal, so CI logs stay
/// free of escape codes.
pub fn log_colors(format: ReportFormat) -> bool {
    match format {
        ReportFormat::Text => std::io::stdout().is_terminal(),
        ReportFormat::Json => std::io::stderr().is_terminal(),
    }
}

pub fn print_banner() {
    println!(
        "{} {}",
        "sitemap-ping".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}

/// Build the hook from the parsed arguments and run it.
///
/// Only setup problems (bad `--target` values) are errors; everything the
/// run itself encounters is recorded in the report.
pub async fn run_hook(args: PingArgs, env: Environment) -> anyhow::Result<RunReport> {
    let hook = Hook::from_options(&args.options).context("could not set up search engine ping")?;
    Ok(hook.run(&args.inputs, &env).await)
}

/// Run `ping`. Always returns normally so the deploy step succeeds.
pub async fn handle_ping(sub_matches: &ArgMatches, verbosity: Verbosity) {
    let args = parse_ping_args(sub_matches);
    let format = args.format;
    init_tracing(verbosity, format);

    let show_summary = verbosity != Verbosity::Quiet;
    if show_summary && format == ReportFormat::Text {
        print_banner();
    }

    let Some(report) = contain(run_hook(args, Environment::capture())).await else {
        return;
    };

    match format {
        ReportFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Could not serialize run report: {}", e),
        },
        ReportFormat::Text if show_summary => print!("{}", report.render_text()),
        ReportFormat::Text => {}
    }
}

/// Drive a run in its own task. Errors and panics are logged at ERROR and
/// swallowed; `None` means there is no report to print.
pub async fn contain<F>(run: F) -> Option<RunReport>
where
    F: Future<Output = anyhow::Result<RunReport>> + Send + 'static,
{
    match tokio::spawn(run).await {
        Ok(Ok(report)) => Some(report),
        Ok(Err(e)) => {
            error!("Search engine ping skipped: {:#}. The deploy is unaffected.", e);
            None
        }
        Err(e) => {
            error!("Search engine ping crashed: {}. The deploy is unaffected.", e);
            None
        }
    }
}

/// One line per target: its name and, when a site URL is known, the exact
/// URL it would be sent.
pub fn target_lines(args: &ArgMatches, env: &Environment) -> anyhow::Result<Vec<String>> {
    let options = HookOptions {
        include_default_targets: !args.get_flag("no-default-targets"),
        extra_targets: extra_targets(args),
        ..Default::default()
    };
    let targets = options.targets()?;

    let sitemap_url = resolve_site_url(
        args.get_one::<String>("site-url").map(String::as_str),
        env.url.as_deref(),
    )
    .map(|site_url| {
        let path = normalize_sitemap_path(args.get_one::<String>("sitemap-path").map(String::as_str));
        format!("{}{}", site_url, path)
    });

    Ok(targets
        .iter()
        .map(|target| match &sitemap_url {
            Some(url) => format!("{:<10} {}", target.name, target.ping_url(url)),
            None => format!("{:<10} {}", target.name, target.endpoint),
        })
        .collect())
}

pub fn handle_targets(sub_matches: &ArgMatches) {
    match target_lines(sub_matches, &Environment::capture()) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    }
}
