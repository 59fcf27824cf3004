//! Human-friendly text output: today's block, the six-day table and a
//! terminal rendering of both temperature curves.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use citycast_core::{
    Config, Curve, CurveKind, DAY_COUNT, Forecast, LineStyle, condition::icon_for, model::day_label,
};

const LABEL_WIDTH: usize = 8;

/// Columns a string occupies on a terminal; CJK, fullwidth forms and most
/// emoji take two.
pub fn term_width(s: &str) -> usize {
    s.width()
}

/// Left-align `s` in `width` terminal columns.
fn pad(s: &str, width: usize) -> String {
    let used = term_width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(used)))
}

/// Center of each day's column; the curve builder's x-positions.
pub fn column_centers(column_width: u16) -> [i32; DAY_COUNT] {
    let w = i32::from(column_width.max(1));
    std::array::from_fn(|i| LABEL_WIDTH as i32 + i as i32 * w + w / 2)
}

pub fn forecast(forecast: &Forecast, config: &Config) -> String {
    let mut out = String::new();
    today(&mut out, forecast);
    out.push('\n');
    days_table(&mut out, forecast, usize::from(config.curve.column_width.max(1)));
    out.push('\n');

    let builder = config.curve_builder();
    let xs = column_centers(config.curve.column_width);
    let height = config.curve.height.max(3);
    let y_center = i32::from(height / 2);

    for (kind, title) in [(CurveKind::High, "最高温"), (CurveKind::Low, "最低温")] {
        let curve = forecast.curve(kind, &builder, &xs, y_center);
        let _ = writeln!(out, "{title}");
        out.push_str(&chart(&curve, height, xs[DAY_COUNT - 1] as usize + LABEL_WIDTH));
    }

    out
}

fn today(out: &mut String, forecast: &Forecast) {
    let t = &forecast.today;
    let icon = icon_for(&t.condition_type).unwrap_or("-");

    let _ = writeln!(out, "{}  {} {}", t.city_name, t.display_date(), forecast.today_day().week);
    let _ = writeln!(
        out,
        "{} [{icon}]  {}°C  {}~{}°C",
        t.condition_type, t.current_temp_text, t.low_temp, t.high_temp
    );
    let _ = writeln!(out, "感冒指数: {}", t.cold_risk_index);
    let _ = writeln!(
        out,
        "{} {}  PM2.5 {}  湿度 {}  空气质量 {}",
        t.wind_direction, t.wind_force, t.pm25, t.humidity_text, t.quality_text
    );
}

fn days_table(out: &mut String, forecast: &Forecast, col: usize) {
    let aqi = forecast.aqi_categories();
    let rows: [(&str, [String; DAY_COUNT]); 6] = [
        ("", std::array::from_fn(|i| day_label(i, &forecast.days[i]))),
        ("日期", forecast.days.each_ref().map(|d| d.short_date())),
        ("天气", forecast.days.each_ref().map(|d| d.condition_type.clone())),
        ("空气", aqi.map(|c| c.label().to_owned())),
        ("风向", forecast.days.each_ref().map(|d| d.wind_direction.clone())),
        ("风力", forecast.days.each_ref().map(|d| d.wind_force.clone())),
    ];

    for (title, cells) in rows {
        let mut line = pad(title, LABEL_WIDTH);
        for cell in &cells {
            line.push_str(&pad(cell, col));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

/// Draw a curve into a `height`-row character grid (at least one row).
/// Points outside the grid are clamped to its top or bottom row.
pub fn chart(curve: &Curve, height: u16, width: usize) -> String {
    let rows = usize::from(height.max(1));
    let clamp_row = |y: i32| y.clamp(0, rows as i32 - 1) as usize;
    let mut grid = vec![vec![' '; width + 1]; rows];

    let mut put = |x: i32, row: usize, c: char| {
        if let Ok(x) = usize::try_from(x) {
            if let Some(cell) = grid[row].get_mut(x) {
                *cell = c;
            }
        }
    };

    for segment in &curve.segments {
        let (x0, y0) = segment.from;
        let (x1, y1) = segment.to;
        let dx = (x1 - x0).max(1);
        let (fy0, fy1) = (f64::from(y0), f64::from(y1));
        for x in x0 + 1..x1 {
            if segment.style == LineStyle::Dotted && (x - x0) % 2 == 1 {
                continue;
            }
            let y = fy0 + (fy1 - fy0) * f64::from(x - x0) / f64::from(dx);
            let c = if segment.style == LineStyle::Dotted { '·' } else { '-' };
            put(x, clamp_row(y.round() as i32), c);
        }
    }

    for point in &curve.points {
        let row = clamp_row(point.y);
        put(point.x, row, 'o');
        if rows == 1 {
            continue;
        }

        let label_row = if row > 0 { row - 1 } else { row + 1 };
        let start = point.x - point.label.chars().count() as i32 / 2;
        for (i, c) in point.label.chars().enumerate() {
            put(start + i as i32, label_row, c);
        }
    }

    grid.iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_owned())
        .fold(String::new(), |mut acc, line| {
            acc.push_str(&line);
            acc.push('\n');
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use citycast_core::{CurveBuilder, DaySummary, TodaySummary};

    fn sample() -> Forecast {
        let day = |week: &str, date: &str, high: i32, low: i32, aqi: f64| DaySummary {
            week: week.into(),
            date: date.into(),
            condition_type: "晴".into(),
            high_temp: high,
            low_temp: low,
            wind_direction: "北风".into(),
            wind_force: "2级".into(),
            aqi,
        };
        Forecast {
            today: TodaySummary {
                city_name: "北京".into(),
                current_date: "20231201".into(),
                condition_type: "晴".into(),
                current_temp_text: "11".into(),
                high_temp: 12,
                low_temp: 3,
                ..TodaySummary::default()
            },
            days: [
                day("星期五", "2023-12-01", 10, 2, 40.0),
                day("星期六", "2023-12-02", 12, 3, 60.0),
                day("星期日", "2023-12-03", 14, 4, 120.0),
                day("星期一", "2023-12-04", 16, 5, 160.0),
                day("星期二", "2023-12-05", 18, 6, 210.0),
                day("星期三", "2023-12-06", 20, 7, 300.0),
            ],
        }
    }

    #[test]
    fn cjk_counts_double_width() {
        assert_eq!(term_width("abc"), 3);
        assert_eq!(term_width("北京"), 4);
        assert_eq!(term_width("12°C"), 4);
        assert_eq!(pad("晴", 4), "晴  ");
        assert_eq!(term_width("🌈"), 2);
        assert_eq!(pad("🌈晴", 6), "🌈晴  ");
        assert_eq!(term_width("ＰＭ"), 4);
    }

    #[test]
    fn columns_are_evenly_spaced() {
        assert_eq!(column_centers(10), [13, 23, 33, 43, 53, 63]);
    }

    #[test]
    fn chart_places_points_on_their_rows() {
        let xs = column_centers(10);
        let curve = CurveBuilder::new(1.0).build(&[10, 10, 12, 10, 8, 10], &xs, 5);
        let text = chart(&curve, 11, 70);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[5].chars().nth(13), Some('o'));
        assert_eq!(lines[3].chars().nth(33), Some('o'));
        assert_eq!(lines[7].chars().nth(53), Some('o'));
        assert!(lines[2].contains("12°C"));
    }

    #[test]
    fn first_segment_is_dotted_and_others_solid() {
        let xs = column_centers(10);
        let curve = CurveBuilder::new(1.0).build(&[5; 6], &xs, 2);
        let text = chart(&curve, 5, 70);
        let row: Vec<char> = text.lines().nth(2).unwrap().chars().collect();

        assert_eq!(row[14], ' ');
        assert_eq!(row[15], '·');
        assert!(row[24..33].iter().all(|&c| c == '-'));
    }

    #[test]
    fn out_of_range_points_are_clamped() {
        let xs = column_centers(10);
        let curve = CurveBuilder::new(5.0).build(&[0, 0, 0, 0, 0, 30], &xs, 2);
        let text = chart(&curve, 5, 70);

        assert_eq!(text.lines().next().unwrap().chars().nth(63), Some('o'));
    }

    #[test]
    fn zero_height_chart_is_one_row() {
        let xs = column_centers(10);
        let curve = CurveBuilder::default().build(&[1, 5, 9, 3, 7, 2], &xs, 0);
        let text = chart(&curve, 0, 70);

        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.lines().next().unwrap().chars().filter(|&c| c == 'o').count(), 6);
    }

    #[test]
    fn extreme_curve_is_clamped_into_the_grid() {
        let xs = column_centers(10);
        let curve = CurveBuilder::new(1e6).build(&[i32::MIN, i32::MAX, 0, 0, 0, 0], &xs, 2);
        let text = chart(&curve, 5, 70);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4].chars().nth(13), Some('o'));
        assert_eq!(lines[0].chars().nth(23), Some('o'));
    }

    #[test]
    fn full_forecast_rendering() {
        let text = forecast(&sample(), &Config::default());

        assert!(text.starts_with("北京  2023/12/01 星期六\n"));
        assert!(text.contains("晴 [Qing]  11°C  3~12°C"));
        assert!(text.contains("昨天"));
        assert!(text.contains("明天"));
        assert!(text.contains("周一"));
        assert!(text.contains("12/06"));
        assert!(text.contains("严重"));
        assert!(text.contains("最高温\n"));
        assert!(text.contains("最低温\n"));
        assert!(text.contains("20°C"));
    }
}
