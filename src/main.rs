use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use battery_analyzer::analyzer::is_expected_outcome;
use battery_analyzer::config::{default_config_path, AnalyzerConfig};
use battery_analyzer::device::{ReplaySource, SimulatedDevice};
use battery_analyzer::{configure_logging, BatteryAnalyzer, BatteryReport, TelemetrySource};

/// Voltage step of the built-in simulation, in mV per sample
const SIMULATED_STEP_MV: i32 = -2;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> anyhow::Result<ExitCode> {
    let config = AnalyzerConfig::load().context("Failed to load configuration")?;
    init_logging(&config)?;

    let json = args.iter().any(|arg| arg == "--json");
    let positional: Vec<&str> = args
        .iter()
        .skip(1)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect();

    match positional.as_slice() {
        ["simulate"] => {
            let device = SimulatedDevice::default().with_voltage_step(SIMULATED_STEP_MV);
            analyze(config, &device, json).await
        }
        ["replay", path] => {
            let source = ReplaySource::from_path(&PathBuf::from(path))
                .with_context(|| format!("Failed to load recording {}", path))?;
            analyze(config, &source, json).await
        }
        ["config"] => {
            println!("Config file: {}", default_config_path().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            print_usage();
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_logging(config: &AnalyzerConfig) -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
        return Ok(());
    }
    configure_logging(config.log_level, config.log_file.clone(), true).map_err(anyhow::Error::msg)
}

async fn analyze<S>(config: AnalyzerConfig, source: &S, json: bool) -> anyhow::Result<ExitCode>
where
    S: TelemetrySource + ?Sized,
{
    let analyzer = BatteryAnalyzer::try_new(config)?;

    let cancel_token = CancellationToken::new();
    let ctrlc_token = cancel_token.clone();
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, abandoning analysis");
        ctrlc_token.cancel();
    })
    .context("Failed to set Ctrl+C handler")?;

    match analyzer.run_until_cancelled(source, &cancel_token).await {
        Ok(report) => {
            print_report(&report, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if is_expected_outcome(&e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_report(report: &BatteryReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn print_usage() {
    println!("battery-analyzer - battery health diagnostics");
    println!("\nUsage:");
    println!("  battery-analyzer simulate [--json]       - Analyze a simulated draining battery");
    println!("  battery-analyzer replay <file> [--json]  - Analyze recorded battery responses (JSON lines)");
    println!("  battery-analyzer config                  - Show the active configuration");
}
