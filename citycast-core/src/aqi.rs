//! Air quality index bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    Excellent,
    Good,
    LightlyPolluted,
    ModeratelyPolluted,
    HeavilyPolluted,
    SeverelyPolluted,
}

/// Inclusive bands, tested in order. Adjacent bands share their boundary,
/// so a boundary value lands in the lower band.
const BANDS: [(f64, f64, AqiCategory); 5] = [
    (0.0, 50.0, AqiCategory::Excellent),
    (50.0, 100.0, AqiCategory::Good),
    (100.0, 150.0, AqiCategory::LightlyPolluted),
    (150.0, 200.0, AqiCategory::ModeratelyPolluted),
    (200.0, 250.0, AqiCategory::HeavilyPolluted),
];

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Excellent,
        AqiCategory::Good,
        AqiCategory::LightlyPolluted,
        AqiCategory::ModeratelyPolluted,
        AqiCategory::HeavilyPolluted,
        AqiCategory::SeverelyPolluted,
    ];

    /// Classify a pollution index. Negative and NaN values clamp to
    /// [`AqiCategory::Excellent`]; anything above 250 is severe.
    pub fn classify(aqi: f64) -> Self {
        if aqi.is_nan() || aqi < 0.0 {
            return AqiCategory::Excellent;
        }

        BANDS
            .iter()
            .find(|(low, high, _)| aqi >= *low && aqi <= *high)
            .map(|(_, _, category)| *category)
            .unwrap_or(AqiCategory::SeverelyPolluted)
    }

    pub fn color(&self) -> Rgb {
        match self {
            AqiCategory::Excellent => Rgb(121, 184, 0),
            AqiCategory::Good => Rgb(255, 187, 23),
            AqiCategory::LightlyPolluted => Rgb(255, 87, 97),
            AqiCategory::ModeratelyPolluted => Rgb(235, 17, 27),
            AqiCategory::HeavilyPolluted => Rgb(170, 0, 0),
            AqiCategory::SeverelyPolluted => Rgb(110, 0, 0),
        }
    }

    /// Short label in the provider's locale.
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Excellent => "优",
            AqiCategory::Good => "良",
            AqiCategory::LightlyPolluted => "轻度",
            AqiCategory::ModeratelyPolluted => "中度",
            AqiCategory::HeavilyPolluted => "重度",
            AqiCategory::SeverelyPolluted => "严重",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Excellent => "excellent",
            AqiCategory::Good => "good",
            AqiCategory::LightlyPolluted => "lightly polluted",
            AqiCategory::ModeratelyPolluted => "moderately polluted",
            AqiCategory::HeavilyPolluted => "heavily polluted",
            AqiCategory::SeverelyPolluted => "severely polluted",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, AqiCategory::Excellent)]
    #[case(40.0, AqiCategory::Excellent)]
    #[case(50.0, AqiCategory::Excellent)]
    #[case(50.5, AqiCategory::Good)]
    #[case(100.0, AqiCategory::Good)]
    #[case(101.0, AqiCategory::LightlyPolluted)]
    #[case(150.0, AqiCategory::LightlyPolluted)]
    #[case(175.0, AqiCategory::ModeratelyPolluted)]
    #[case(200.0, AqiCategory::ModeratelyPolluted)]
    #[case(249.9, AqiCategory::HeavilyPolluted)]
    #[case(250.0, AqiCategory::HeavilyPolluted)]
    #[case(250.1, AqiCategory::SeverelyPolluted)]
    #[case(300.0, AqiCategory::SeverelyPolluted)]
    fn classifies_into_first_matching_band(#[case] aqi: f64, #[case] expected: AqiCategory) {
        assert_eq!(AqiCategory::classify(aqi), expected);
    }

    #[rstest]
    #[case(-5.0)]
    #[case(-0.1)]
    #[case(f64::NEG_INFINITY)]
    #[case(f64::NAN)]
    fn out_of_range_low_values_clamp_to_excellent(#[case] aqi: f64) {
        assert_eq!(AqiCategory::classify(aqi), AqiCategory::Excellent);
    }

    #[test]
    fn infinity_is_severe() {
        assert_eq!(AqiCategory::classify(f64::INFINITY), AqiCategory::SeverelyPolluted);
    }

    #[test]
    fn categories_are_ordered_by_severity() {
        let mut sorted = AqiCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, AqiCategory::ALL);
    }

    #[test]
    fn colors_and_labels() {
        assert_eq!(AqiCategory::Excellent.color(), Rgb(121, 184, 0));
        assert_eq!(AqiCategory::SeverelyPolluted.color(), Rgb(110, 0, 0));
        assert_eq!(AqiCategory::Good.label(), "良");
        assert_eq!(AqiCategory::LightlyPolluted.to_string(), "lightly polluted");
    }
}
