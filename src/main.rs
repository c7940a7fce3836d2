use clap::Parser as ClapParser;
use reqargs::utils::logger;
use reqargs::{ArgsError, CliConfig, Location, Parser, SimpleRequest, SpecFile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting reqargs CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let spec = match SpecFile::from_file(&config.spec) {
        Ok(spec) => spec,
        Err(e) => {
            tracing::error!("❌ Failed to load spec '{}': {}", config.spec, e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };
    tracing::info!(
        "Loaded spec '{}' with {} arguments",
        spec.spec.name,
        spec.args.len()
    );

    let raw = tokio::fs::read_to_string(&config.request).await?;
    let captured: serde_json::Value = serde_json::from_str(&raw)?;
    let request = SimpleRequest::from_value(captured)?;

    let argmap = spec.build()?;

    // CLI override beats the spec's own location list.
    let locations: Option<Vec<Location>> = if config.locations.is_empty() {
        spec.locations()
    } else {
        Some(
            config
                .locations
                .iter()
                .map(|n| Location::from_name(n))
                .collect(),
        )
    };

    let parser = Parser::new();
    match parser
        .parse_with(&argmap, &request, locations.as_deref(), &[])
        .await
    {
        Ok(parsed) => {
            let output = if config.pretty {
                serde_json::to_string_pretty(&parsed.data)?
            } else {
                serde_json::to_string(&parsed.data)?
            };
            tracing::info!("✅ Parsed {} arguments", parsed.len());
            println!("{}", output);
        }
        Err(ArgsError::Validation(err)) => {
            tracing::error!("❌ Validation failed: {} (status {})", err, err.status_code);
            eprintln!("❌ {} (status {})", err, err.status_code);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("❌ Parse failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}
