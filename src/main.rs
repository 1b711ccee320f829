mod config;
mod emitter;
mod error;
mod extract;
mod http;
mod identifiers;
mod model;
mod paginator;
mod pipeline;
mod resolver;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::config::{FailurePolicy, Settings};
use crate::http::HttpClient;
use crate::identifiers::IdentifierSet;

#[derive(Parser)]
#[command(
    name = "convento_archiver",
    about = "Collect My Convento press releases and their PDF copies into sitemaps"
)]
struct Cli {
    /// INI config file with a [main] section
    #[arg(short, long, global = true, default_value = "config.cfg")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index pages, resolve every press release, write the three sitemaps
    Run {
        /// Detail pages fetched in parallel (overrides config)
        #[arg(short = 'j', long, value_parser = clap::value_parser!(u32).range(1..))]
        concurrency: Option<u32>,
        /// Skip press releases without a PDF link instead of aborting
        #[arg(long)]
        skip_failures: bool,
    },
    /// Only walk the index and print each press-release id and URL found
    Discover,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Bad arguments count as configuration errors; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let settings = match Settings::load(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Problem reading config {}: {}", cli.config.display(), e);
            return ExitCode::from(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::from(2);
        }
    };

    match runtime.block_on(execute(cli.command, settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn execute(command: Commands, mut settings: Settings) -> anyhow::Result<()> {
    let t0 = Instant::now();

    match command {
        Commands::Run {
            concurrency,
            skip_failures,
        } => {
            if let Some(n) = concurrency {
                settings.concurrency = n as usize;
            }
            if skip_failures {
                settings.failure_policy = FailurePolicy::Skip;
            }
            let client = HttpClient::new(&settings)?;
            let summary = pipeline::run(&client, &settings).await?;
            summary.print();
        }
        Commands::Discover => {
            let client = HttpClient::new(&settings)?;
            let discovery = paginator::discover(&client, &settings).await?;
            print!("{}", discovery_listing(&discovery.ids, &settings.detail_base_url));
            println!(
                "\n{} press releases over {} pages{}",
                discovery.ids.len(),
                discovery.pages_fetched,
                if discovery.exhausted { "" } else { " (page bound reached)" }
            );
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

/// One `id<TAB>detail url` line per press release.
fn discovery_listing(ids: &IdentifierSet, detail_base: &str) -> String {
    ids.iter()
        .map(|id| format!("{}\t{}\n", id, extract::detail_url(detail_base, id)))
        .collect()
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "convento_archiver",
            "--config",
            "acme.cfg",
            "run",
            "-j",
            "8",
            "--skip-failures",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("acme.cfg"));
        match cli.command {
            Commands::Run {
                concurrency,
                skip_failures,
            } => {
                assert_eq!(concurrency, Some(8));
                assert!(skip_failures);
            }
            Commands::Discover => panic!("expected run"),
        }
    }

    #[test]
    fn discovery_listing_pairs_id_with_url() {
        let ids: IdentifierSet = ["20".to_string(), "10".to_string()].into_iter().collect();
        assert_eq!(
            discovery_listing(&ids, "https://x/news_id/"),
            "10\thttps://x/news_id/10\n20\thttps://x/news_id/20\n"
        );
    }

    #[test]
    fn cli_rejects_zero_concurrency() {
        let err = Cli::try_parse_from(["convento_archiver", "run", "--concurrency", "0"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
