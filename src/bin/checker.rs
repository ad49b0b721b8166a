//! json-fixtures-check - validate configured fixtures against their contract
//!
//! Exits with a non-zero status when any fixture breaks an invariant.
use anyhow::Context;
use clap::Parser;

use json_fixtures::catalog::Catalog;
use json_fixtures::config::{Config, ReportFormat};
use json_fixtures::contract::ContractReport;
use json_fixtures::types::UserRecord;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "json-fixtures-check", version)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "JF_CONFIG", default_value = "config.yaml")]
    config: String,
    /// Report format, overrides the configuration
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,
    /// Print the JSON schema of a fixture record and exit
    #[arg(long)]
    print_schema: bool,
}

fn main() -> anyhow::Result<()> {
    //Enable logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if args.print_schema {
        let schema = schemars::schema_for!(UserRecord);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    tracing::info!("Starting json-fixtures-check");

    let config = Config::new(&args.config)
        .with_context(|| format!("failed to load configuration {}", args.config))?;
    let catalog = Catalog::from_config(&config)?;
    if catalog.entries().is_empty() {
        tracing::warn!("No fixtures configured in {}", args.config);
    }
    let reports = catalog.check();

    match args.format.unwrap_or(config.report.format) {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        ReportFormat::Text => print!("{}", render_text(&reports)),
    }

    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    tracing::info!(
        "Stopped json-fixtures-check: {} fixtures, {} failed",
        reports.len(),
        failed
    );
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// One status line per fixture followed by its violations
fn render_text(reports: &[ContractReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let status = if report.is_ok() { "ok" } else { "FAILED" };
        out.push_str(&format!(
            "{}: {} records, fingerprint {}: {}\n",
            report.fixture,
            report.records,
            report.fingerprint.as_deref().unwrap_or("-"),
            status
        ));
        for violation in report.violations.iter() {
            out.push_str(&format!("  - {}\n", violation));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use json_fixtures::contract::Violation;

    #[test]
    fn test_render_text() {
        let mut clean = ContractReport::new("clean", 3);
        clean.fingerprint = Some("ab12".to_string());
        let mut broken = ContractReport::new("broken", 2);
        broken.push(Violation::IndexMismatch {
            position: 1,
            index: 5,
        });
        assert_eq!(
            render_text(&[clean, broken]),
            "clean: 3 records, fingerprint ab12: ok\n\
             broken: 2 records, fingerprint -: FAILED\n  \
             - record at position 1 has index 5\n"
        );
    }
}
