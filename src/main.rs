use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use studio_billing::app::ingestion::ingest_export;
use studio_billing::config::{CliConfig, Command};
use studio_billing::utils::{logger, validation::Validate};
use studio_billing::{BillingEngine, BillingError, BillingPipeline, LocalStorage, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match TomlConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with(&e);
        }
    };

    if config.logging.enabled {
        logger::init_logger_with_file(cli.verbose, &config.logging)
            .context("Failed to open the log file")?;
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting studio-billing");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Command::Process(args) | Command::Run(args) = &cli.command {
        args.apply_to(&mut config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let result = match &cli.command {
        Command::Ingest => ingest(&config).map(|_| ()),
        Command::Process(_) => process(&config, cli.json),
        Command::Run(_) => ingest(&config).and_then(|path| {
            config.processing.use_ingested_input(&path);
            process(&config, cli.json)
        }),
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}

fn ingest(config: &TomlConfig) -> Result<PathBuf, BillingError> {
    let today = chrono::Local::now().date_naive();
    let path = ingest_export(&config.ingestion, today)?;
    println!("📥 File successfully ingested to {}", path.display());
    Ok(path)
}

fn process(config: &TomlConfig, json: bool) -> Result<(), BillingError> {
    let pipeline = BillingPipeline::new(LocalStorage::default(), config.clone());
    let report = BillingEngine::new(pipeline).run()?;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::warn!("Cannot render run report as JSON: {}", e),
        }
    } else {
        println!(
            "🛠 Processing completed: {} classes, {} hours, {} EUR",
            report.billed_records, report.total_hours, report.total_amount
        );
        println!("📁 Output saved to: {}", report.output_file);
    }
    Ok(())
}

fn exit_with(e: &BillingError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
