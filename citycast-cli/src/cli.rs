use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use citycast_core::{
    CityCodeResolver, CitySource, Config, CurveKind, ResolveError, ServiceError, WeatherService,
};
use inquire::{Confirm, CustomType, CustomUserError, InquireError, Text, validator::Validation};
use serde_json::json;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Six-day city weather forecast")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show yesterday, today and the next four days for a city.
    Show {
        /// City name, e.g. "北京" or "苏州". Defaults to the configured city.
        city: Option<String>,

        /// Print the model, AQI bands and curve geometry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the provider city code for a city name.
    Resolve {
        city: String,
    },

    /// Interactively edit the configuration file.
    Configure,

    /// Prompt for cities and redraw whenever a forecast arrives.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show { city, json } => show(&config, city, json).await,
            Command::Resolve { city } => resolve(&config, &city),
            Command::Configure => configure(config),
            Command::Interactive => interactive(config).await,
        }
    }
}

async fn show(config: &Config, city: Option<String>, as_json: bool) -> anyhow::Result<()> {
    let city = match city {
        Some(city) => city,
        None => config.default_city()?.to_owned(),
    };

    let service = WeatherService::from_config(config)?;
    let forecast = match service.refresh(&city).await {
        Ok(forecast) => forecast,
        Err(ServiceError::Resolve(err)) => return Err(unknown_city(config, err)),
        Err(err) => return Err(err.into()),
    };

    if as_json {
        let builder = config.curve_builder();
        let xs = render::column_centers(config.curve.column_width);
        let y_center = i32::from(config.curve.height / 2);

        let doc = json!({
            "forecast": forecast.as_ref(),
            "aqi": forecast.aqi_categories(),
            "curves": {
                "high": forecast.curve(CurveKind::High, &builder, &xs, y_center),
                "low": forecast.curve(CurveKind::Low, &builder, &xs, y_center),
            },
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render::forecast(&forecast, config));
    }

    Ok(())
}

fn resolve(config: &Config, city: &str) -> anyhow::Result<()> {
    let resolver = CityCodeResolver::new(config.city_source());
    if let Err(err) = resolver.index() {
        bail!("City index unavailable: {err}");
    }

    match resolver.resolve(city) {
        Some(code) => {
            println!("{code}");
            Ok(())
        }
        None => Err(unknown_city(config, ResolveError::NotFound { city: city.trim().to_owned() })),
    }
}

const BUNDLED_INDEX_HINT: &str = "Hint: the built-in city list only covers major cities. \
Set `city_index` in the config file to the provider's full citycode.json.";

/// A lookup miss, with a pointer to `city_index` when the built-in list was used.
fn unknown_city(config: &Config, err: ResolveError) -> anyhow::Error {
    match config.city_source() {
        CitySource::Bundled => anyhow!("{err}\n{BUNDLED_INDEX_HINT}"),
        _ => err.into(),
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let city = Text::new("Default city:")
        .with_default(config.default_city.as_deref().unwrap_or("北京"))
        .prompt()?;
    config.set_default_city(city.trim());

    config.base_url = Text::new("Forecast endpoint:")
        .with_default(&config.base_url)
        .with_help_message("the city code is appended as the last path segment")
        .prompt()?;

    config.curve.scale = CustomType::<f64>::new("Curve scale (units per °C):")
        .with_default(config.curve.scale)
        .with_validator(|scale: &f64| -> Result<Validation, CustomUserError> {
            if scale.is_finite() && *scale > 0.0 {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("must be a positive number".into()))
            }
        })
        .prompt()?;

    config.lenient_temperatures = Confirm::new("Treat malformed temperatures as 0°C?")
        .with_default(config.lenient_temperatures)
        .prompt()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn interactive(config: Config) -> anyhow::Result<()> {
    let service = Arc::new(WeatherService::from_config(&config)?);
    let initial_city = config.default_city().ok().map(str::to_owned);

    let mut updates = service.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if let Some(forecast) = snapshot {
                println!("\n{}", render::forecast(&forecast, &config));
            }
        }
    });

    if let Some(city) = initial_city {
        spawn_refresh(&service, city);
    }

    loop {
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("City:").with_help_message("empty line or Esc to quit").prompt()
        })
        .await
        .context("City prompt panicked")?;

        match answer {
            Ok(city) if !city.trim().is_empty() => spawn_refresh(&service, city),
            Ok(_) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                break;
            }
            Err(err) => {
                printer.abort();
                return Err(err.into());
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Start a refresh without waiting for it. Earlier refreshes still in flight
/// keep running; whichever finishes last is what stays on screen.
fn spawn_refresh(service: &Arc<WeatherService>, city: String) {
    let service = Arc::clone(service);
    tokio::spawn(async move {
        if let Err(err) = service.refresh(&city).await {
            eprintln!("warning: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ResolveError {
        ResolveError::NotFound { city: "南宁".into() }
    }

    #[test]
    fn bundled_miss_points_at_city_index() {
        let msg = unknown_city(&Config::default(), not_found()).to_string();
        assert!(msg.starts_with("Unknown city '南宁'."));
        assert!(msg.contains("`city_index`"));
    }

    #[test]
    fn custom_index_miss_has_no_hint() {
        let config = Config { city_index: Some("/srv/citycode.json".into()), ..Config::default() };
        let err = unknown_city(&config, not_found());

        assert!(!err.to_string().contains("city_index"));
        assert_eq!(err.downcast_ref::<ResolveError>(), Some(&not_found()));
    }

    #[test]
    fn resolve_reports_bundled_miss_with_hint() {
        let err = resolve(&Config::default(), "  不存在的城市 ").unwrap_err();
        assert!(err.to_string().contains("Unknown city '不存在的城市'"));
        assert!(err.to_string().contains("`city_index`"));
    }
}
