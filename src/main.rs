//! Command-line driver for the conversion engine: feed it a selection
//! snippet and it prints what the on-page popup would show.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use omniconvert::converter;
use omniconvert::currency;
use omniconvert::currency::http::ReqwestClient;
use omniconvert::currency::storage::RedbStore;
use omniconvert::{find_conversion, ConversionKind, Preset, RateService, UserSettings};

#[derive(Parser)]
#[command(author, version, about = "Select-to-convert engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and convert a selection snippet
    Convert {
        /// The selected text, e.g. "10 feet", "6m × 4m × 2.5m" or "$100"
        text: String,
        /// Resolve currency conversions against the live rate APIs
        #[arg(long)]
        online: bool,
    },
    /// Print the active settings
    Settings,
    /// Reset the stored settings to a preset
    SetPreset {
        /// metric or imperial
        preset: String,
    },
    /// Warm the currency rate cache (fetches the usd base)
    Warm,
    /// Drop the cached currency rates
    ClearCache,
}

fn load_settings() -> UserSettings {
    UserSettings::load().unwrap_or_else(|e| {
        log::warn!("Failed to load settings ({}); using defaults", e);
        UserSettings::default()
    })
}

fn rate_service() -> Result<RateService> {
    let store = RedbStore::open_default().context("opening the rate cache store")?;
    let http = ReqwestClient::new().context("building the HTTP client")?;
    Ok(RateService::new(Arc::new(store), Arc::new(http)))
}

async fn convert_command(text: &str, online: bool) -> Result<()> {
    let settings = load_settings();
    let conversion =
        find_conversion(text, &settings).ok_or_else(|| anyhow!("no conversion found in {:?}", text))?;

    match &conversion.kind {
        ConversionKind::CurrencyPending {
            from_code,
            to_code,
            amount,
        } => {
            if !online {
                println!(
                    "{} {} → {} (pass --online to fetch the rate)",
                    amount, from_code, to_code
                );
                return Ok(());
            }
            let service = rate_service()?;
            service.update_activity().await;
            let result = service.get_currency_rate(from_code, to_code).await?;
            let rendered = currency::format_currency(amount * result.rate, to_code, "en-US");
            if result.stale {
                println!("{} (stale rate)", rendered);
            } else if result.used_fallback {
                println!("{} (fallback rate)", rendered);
            } else {
                println!("{}", rendered);
            }
        }
        _ => {
            let rendered = converter::format_conversion(&conversion, &settings)
                .ok_or_else(|| anyhow!("unrenderable conversion"))?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { text, online } => convert_command(&text, online).await?,
        Commands::Settings => {
            let settings = load_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::SetPreset { preset } => {
            let preset = match preset.as_str() {
                "metric" => Preset::Metric,
                "imperial" => Preset::Imperial,
                other => {
                    return Err(anyhow!("unknown preset {:?} (use metric or imperial)", other))
                }
            };
            let mut settings = load_settings();
            settings.apply_preset(preset);
            settings.save().context("saving settings")?;
            println!("preset set to {:?}", preset);
        }
        Commands::Warm => {
            let service = rate_service()?;
            service.update_activity().await;
            service.warm_cache().await?;
            println!("rate cache warmed");
        }
        Commands::ClearCache => {
            rate_service()?.clear_cache().await?;
            println!("rate cache cleared");
        }
    }
    Ok(())
}
