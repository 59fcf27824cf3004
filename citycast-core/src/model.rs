use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    aqi::AqiCategory,
    curve::{Curve, CurveBuilder, CurveKind},
};

/// Number of modeled days: yesterday, today and four forecast days.
pub const DAY_COUNT: usize = 6;

/// Index of today within [`Forecast::days`].
pub const TODAY: usize = 1;

/// One forecast day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Weekday label as sent by the provider, e.g. "星期五".
    pub week: String,
    /// `yyyy-MM-dd`.
    pub date: String,
    pub condition_type: String,
    pub high_temp: i32,
    pub low_temp: i32,
    pub wind_direction: String,
    pub wind_force: String,
    pub aqi: f64,
}

impl DaySummary {
    /// `MM/dd`, or the raw date when it is not `yyyy-MM-dd`.
    pub fn short_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date.format("%m/%d").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// "周" followed by the last character of the weekday label.
    pub fn short_week(&self) -> String {
        match self.week.chars().last() {
            Some(day) => format!("周{day}"),
            None => String::new(),
        }
    }

    pub fn aqi_category(&self) -> AqiCategory {
        AqiCategory::classify(self.aqi)
    }
}

/// Today's block: day 1 of the forecast overlaid with the response's
/// top-level current conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub city_name: String,
    /// Provider date, `yyyyMMdd`.
    pub current_date: String,
    pub cold_risk_index: String,
    pub current_temp_text: String,
    pub humidity_text: String,
    pub pm25: i64,
    pub quality_text: String,

    pub condition_type: String,
    pub high_temp: i32,
    pub low_temp: i32,
    pub wind_direction: String,
    pub wind_force: String,
}

impl TodaySummary {
    /// `yyyy/MM/dd`, or the raw date when it is not `yyyyMMdd`.
    pub fn display_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.current_date, "%Y%m%d") {
            Ok(date) => date.format("%Y/%m/%d").to_string(),
            Err(_) => self.current_date.clone(),
        }
    }
}

/// The normalized six-day model produced by one successful parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub today: TodaySummary,
    pub days: [DaySummary; DAY_COUNT],
}

impl Forecast {
    pub fn yesterday(&self) -> &DaySummary {
        &self.days[0]
    }

    pub fn today_day(&self) -> &DaySummary {
        &self.days[TODAY]
    }

    pub fn highs(&self) -> [i32; DAY_COUNT] {
        self.days.each_ref().map(|d| d.high_temp)
    }

    pub fn lows(&self) -> [i32; DAY_COUNT] {
        self.days.each_ref().map(|d| d.low_temp)
    }

    pub fn aqi_categories(&self) -> [AqiCategory; DAY_COUNT] {
        self.days.each_ref().map(DaySummary::aqi_category)
    }

    /// Curve geometry for the high or low series.
    pub fn curve(
        &self,
        kind: CurveKind,
        builder: &CurveBuilder,
        xs: &[i32; DAY_COUNT],
        y_center: i32,
    ) -> Curve {
        let values = match kind {
            CurveKind::High => self.highs(),
            CurveKind::Low => self.lows(),
        };
        builder.build(&values, xs, y_center)
    }
}

/// Relative day label used by the six-day view: 昨天, 今天, 明天, then the weekday.
pub fn day_label(index: usize, day: &DaySummary) -> String {
    match index {
        0 => "昨天".to_owned(),
        1 => "今天".to_owned(),
        2 => "明天".to_owned(),
        _ => day.short_week(),
    }
}
