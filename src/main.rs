use clap::Parser;
use chrono::Local;
use guard_scan::adapters::source::LineSource;
use guard_scan::domain::ports::ScanSource;
use guard_scan::utils::error::ErrorSeverity;
use guard_scan::utils::{logger, validation::Validate};
use guard_scan::{
    CheckpointDispatcher, CliConfig, EntryLog, GuardError, ScanDispatcher, ScanMode, ScanOutcome,
    ScanSession, TomlConfig, VisitorForm,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting guard-scan in {:?} mode", cli.mode);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run(&cli, &config).await {
        exit_with(&e);
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> guard_scan::Result<TomlConfig> {
    cli.validate()?;
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated");
    Ok(config)
}

async fn run(cli: &CliConfig, config: &TomlConfig) -> guard_scan::Result<()> {
    let log = match &cli.input {
        Some(path) => {
            tracing::info!("📁 Reading scans from: {}", path);
            scan_with(LineSource::open(path).await?, cli.mode, config).await?
        }
        None => {
            tracing::info!("Reading scans from stdin, one payload per line");
            scan_with(LineSource::stdin(), cli.mode, config).await?
        }
    };

    if let Some(export) = &config.export {
        let file = std::fs::File::create(&export.path)?;
        log.write_as(&export.format, std::io::BufWriter::new(file))?;
        println!("📁 Entry log saved to: {}", export.path);
    }

    Ok(())
}

async fn scan_with<S: ScanSource>(
    source: S,
    mode: ScanMode,
    config: &TomlConfig,
) -> guard_scan::Result<EntryLog> {
    let mut session = ScanSession::new(source);
    let mut log = EntryLog::new();

    match mode {
        ScanMode::Identity => {
            let dispatcher = ScanDispatcher::new(config.dispatch_options());
            let mut form = VisitorForm::new();

            let report = session
                .run_identity(&dispatcher, &mut form, |outcome, form| {
                    println!("{}", outcome.feedback());
                    if let ScanOutcome::Unrecognized = outcome {
                        return;
                    }
                    match form.submit(Local::now()) {
                        Ok(entry) => {
                            println!(
                                "Visitor Logged: {} ({}) badge {}",
                                entry.full_name, entry.id_number, entry.badge
                            );
                            log.record_visitor(entry);
                        }
                        Err(e) => {
                            // no manual entry on the command line, drop the partial capture
                            eprintln!("❌ {}", e.user_friendly_message());
                            form.clear();
                        }
                    }
                })
                .await?;

            println!(
                "{} scans, {} visitors logged, {} unrecognized",
                report.scans(),
                log.visitors.len(),
                report.rejected()
            );
        }
        ScanMode::Checkpoint => {
            let dispatcher = CheckpointDispatcher::from_config(config);
            let mut roster = config.roster();

            let report = session.run_patrol(&dispatcher, &mut roster).await?;
            for outcome in &report.checkpoint_outcomes {
                match outcome {
                    guard_scan::CheckpointOutcome::Visited { name, .. } => {
                        println!("CHECKPOINT_VERIFIED // {}", name)
                    }
                    guard_scan::CheckpointOutcome::UnrecognizedCheckpoint { tag } => {
                        eprintln!("UNRECOGNIZED_TAG // UNAUTHORIZED_CHECKPOINT ({})", tag)
                    }
                }
            }
            for event in report.check_ins {
                log.record_check_in(event);
            }

            let (completed, total) = roster.progress();
            println!("Patrol progress: {}/{} checkpoints verified", completed, total);
        }
    }

    Ok(log)
}

fn exit_with(e: &GuardError) -> ! {
    tracing::error!(
        "❌ guard-scan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
