//! Provider JSON → [`Forecast`].
//!
//! Structural fields (`data`, `data.yesterday`, `data.forecast`) are required.
//! Scalar fields are extracted defensively: a missing value or one of the
//! wrong JSON type becomes `""` or `0` instead of failing the parse.
//! Temperatures are the exception, see [`parse_temperature`].

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::ParseError,
    model::{DAY_COUNT, DaySummary, Forecast, TODAY, TodaySummary},
};

/// Forecast entries consumed after yesterday.
const FORECAST_DAYS: usize = DAY_COUNT - 1;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawResponse {
    #[serde(deserialize_with = "lenient_string")]
    date: String,
    #[serde(deserialize_with = "lenient_string")]
    message: String,
    #[serde(deserialize_with = "lenient")]
    city_info: Option<RawCityInfo>,
    #[serde(deserialize_with = "lenient")]
    data: Option<RawData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCityInfo {
    #[serde(deserialize_with = "lenient_string")]
    city: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawData {
    #[serde(deserialize_with = "lenient")]
    yesterday: Option<RawDay>,
    #[serde(deserialize_with = "lenient")]
    forecast: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient_string")]
    ganmao: String,
    #[serde(deserialize_with = "lenient_string")]
    wendu: String,
    #[serde(deserialize_with = "lenient_string")]
    shidu: String,
    #[serde(deserialize_with = "lenient_i64")]
    pm25: i64,
    #[serde(deserialize_with = "lenient_string")]
    quality: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDay {
    #[serde(deserialize_with = "lenient_string")]
    week: String,
    #[serde(deserialize_with = "lenient_string")]
    ymd: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    condition: String,
    #[serde(deserialize_with = "lenient_string")]
    high: String,
    #[serde(deserialize_with = "lenient_string")]
    low: String,
    #[serde(deserialize_with = "lenient_string")]
    fx: String,
    #[serde(deserialize_with = "lenient_string")]
    fl: String,
    #[serde(deserialize_with = "lenient_f64")]
    aqi: f64,
}

impl RawDay {
    /// Non-object forecast entries read as an empty day.
    fn from_value(value: Value) -> Self {
        RawDay::deserialize(value).unwrap_or_default()
    }
}

// Each helper swallows type mismatches; only a broken document fails upstream.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or_default())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or_default())
}

/// Parse provider temperature text such as `"高温 30℃"`: take the second
/// whitespace-separated token and drop its trailing unit character.
pub fn parse_temperature(field: &str, text: &str) -> Result<i32, ParseError> {
    text.split_whitespace()
        .nth(1)
        .and_then(|token| {
            let mut chars = token.chars();
            chars.next_back();
            chars.as_str().parse::<i32>().ok()
        })
        .ok_or_else(|| ParseError::MalformedTemperature {
            field: field.to_owned(),
            text: text.to_owned(),
        })
}

/// A successful parse, plus the temperatures that were defaulted to 0 in
/// lenient mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub forecast: Forecast,
    pub warnings: Vec<ParseError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForecastParser {
    lenient_temperatures: bool,
}

impl ForecastParser {
    pub fn new(lenient_temperatures: bool) -> Self {
        Self { lenient_temperatures }
    }

    /// Abort on the first malformed temperature.
    pub fn strict() -> Self {
        Self::new(false)
    }

    /// Default malformed temperatures to 0 and report them as warnings.
    pub fn lenient() -> Self {
        Self::new(true)
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient_temperatures
    }

    pub fn parse(&self, raw: &[u8]) -> Result<ParseOutcome, ParseError> {
        let root: Value = serde_json::from_slice(raw)
            .map_err(|err| ParseError::MalformedJson(err.to_string()))?;
        let response =
            RawResponse::deserialize(root).map_err(|_| missing("data"))?;

        if !response.message.is_empty() {
            debug!(message = %response.message, "provider message");
        }

        let data = response.data.ok_or_else(|| missing("data"))?;
        let yesterday = data.yesterday.ok_or_else(|| missing("data.yesterday"))?;
        let forecast = data.forecast.ok_or_else(|| missing("data.forecast"))?;
        if forecast.len() < FORECAST_DAYS {
            return Err(missing(&format!("data.forecast[{}]", forecast.len())));
        }

        let mut warnings = Vec::new();
        let mut days: [DaySummary; DAY_COUNT] = Default::default();

        days[0] = self.day("data.yesterday", yesterday, &mut warnings)?;
        for (i, entry) in forecast.into_iter().take(FORECAST_DAYS).enumerate() {
            let path = format!("data.forecast[{i}]");
            days[i + 1] = self.day(&path, RawDay::from_value(entry), &mut warnings)?;
        }

        let today = &days[TODAY];
        let today = TodaySummary {
            city_name: response.city_info.map(|c| c.city).unwrap_or_default(),
            current_date: response.date,
            cold_risk_index: data.ganmao,
            current_temp_text: data.wendu,
            humidity_text: data.shidu,
            pm25: data.pm25,
            quality_text: data.quality,
            condition_type: today.condition_type.clone(),
            high_temp: today.high_temp,
            low_temp: today.low_temp,
            wind_direction: today.wind_direction.clone(),
            wind_force: today.wind_force.clone(),
        };

        Ok(ParseOutcome { forecast: Forecast { today, days }, warnings })
    }

    fn day(
        &self,
        path: &str,
        raw: RawDay,
        warnings: &mut Vec<ParseError>,
    ) -> Result<DaySummary, ParseError> {
        Ok(DaySummary {
            high_temp: self.temperature(&format!("{path}.high"), &raw.high, warnings)?,
            low_temp: self.temperature(&format!("{path}.low"), &raw.low, warnings)?,
            week: raw.week,
            date: raw.ymd,
            condition_type: raw.condition,
            wind_direction: raw.fx,
            wind_force: raw.fl,
            aqi: raw.aqi,
        })
    }

    fn temperature(
        &self,
        field: &str,
        text: &str,
        warnings: &mut Vec<ParseError>,
    ) -> Result<i32, ParseError> {
        match parse_temperature(field, text) {
            Ok(value) => Ok(value),
            Err(err) if self.lenient_temperatures => {
                warn!(error = %err, "defaulting temperature to 0");
                warnings.push(err);
                Ok(0)
            }
            Err(err) => Err(err),
        }
    }
}

fn missing(field: &str) -> ParseError {
    ParseError::MissingField(field.to_owned())
}

/// Strict parse of a provider payload.
pub fn parse(raw: &[u8]) -> Result<Forecast, ParseError> {
    ForecastParser::strict().parse(raw).map(|outcome| outcome.forecast)
}
