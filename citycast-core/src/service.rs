//! Resolve → fetch → parse → publish.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    city::CityCodeResolver,
    config::Config,
    error::{ResolveError, ServiceError, TransportError},
    fetch::{Fetcher, HttpFetcher, city_url},
    model::Forecast,
    parser::ForecastParser,
};

/// Latest successfully parsed model, `None` until the first refresh lands.
pub type Snapshot = Option<Arc<Forecast>>;

/// Drives one refresh cycle per call and publishes the result.
///
/// Refreshes are not cancelled: concurrent calls each complete, and each
/// success replaces the published model in completion order. A failed
/// refresh publishes nothing, so the last good model stays current.
#[derive(Debug)]
pub struct WeatherService {
    resolver: Arc<CityCodeResolver>,
    fetcher: Box<dyn Fetcher>,
    parser: ForecastParser,
    base_url: String,
    model: watch::Sender<Snapshot>,
}

impl WeatherService {
    pub fn new(
        resolver: Arc<CityCodeResolver>,
        fetcher: Box<dyn Fetcher>,
        parser: ForecastParser,
        base_url: impl Into<String>,
    ) -> Self {
        let (model, _) = watch::channel(None);
        Self { resolver, fetcher, parser, base_url: base_url.into(), model }
    }

    /// Wire the service from configuration with an HTTP transport.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let resolver = Arc::new(CityCodeResolver::new(config.city_source()));
        let fetcher = HttpFetcher::new(config.request_timeout())?;

        Ok(Self::new(resolver, Box::new(fetcher), config.parser(), config.base_url.clone()))
    }

    pub fn resolver(&self) -> &CityCodeResolver {
        &self.resolver
    }

    /// The most recently published model.
    pub fn current(&self) -> Snapshot {
        self.model.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.model.subscribe()
    }

    /// Fetch and publish the forecast for `city_name`.
    pub async fn refresh(&self, city_name: &str) -> Result<Arc<Forecast>, ServiceError> {
        let result = self.load(city_name).await;

        match &result {
            Ok(forecast) => {
                info!(city = %forecast.today.city_name, "forecast updated");
                self.model.send_replace(Some(Arc::clone(forecast)));
            }
            Err(err) => warn!(city = city_name, error = %err, "refresh failed, keeping previous forecast"),
        }

        result
    }

    async fn load(&self, city_name: &str) -> Result<Arc<Forecast>, ServiceError> {
        let code = self
            .resolver
            .resolve(city_name)
            .ok_or_else(|| ResolveError::NotFound { city: city_name.trim().to_owned() })?;

        let url = city_url(&self.base_url, &code);
        let body = self.fetcher.fetch_bytes(&url).await?;
        let outcome = self.parser.parse(&body)?;

        Ok(Arc::new(outcome.forecast))
    }
}
