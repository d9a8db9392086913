//! Inline SVG line charts for the HTML report and dashboard.

use crate::domain::indicator_helpers::Column;
use crate::domain::ticker_data::TickerData;
use chrono::NaiveDate;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 260.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

pub struct LineSeries {
    pub label: &'static str,
    pub color: &'static str,
    /// One value per date; `None` breaks the line.
    pub values: Vec<Option<f64>>,
}

/// Renders one or more series over a shared date axis.
///
/// `guides` are horizontal dashed lines (e.g. RSI 30/70). Returns an empty
/// string when there is nothing to draw.
pub fn generate_line_svg(
    title: &str,
    dates: &[NaiveDate],
    series: &[LineSeries],
    guides: &[f64],
) -> String {
    let finite = series
        .iter()
        .flat_map(|s| s.values.iter().flatten())
        .chain(guides.iter())
        .copied()
        .filter(|v| v.is_finite());
    let (min_v, max_v) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if dates.is_empty() || !min_v.is_finite() {
        return String::new();
    }
    let range = (max_v - min_v).max(1e-9);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (dates.len() - 1).max(1) as f64) * plot_width };
    let y_scale = |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_v) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" font-size=\"12\" fill=\"#333\">{}</text>\n",
        MARGIN_LEFT, title
    ));

    // Legend
    let mut legend_x = CHART_WIDTH - MARGIN_RIGHT;
    for s in series.iter().rev() {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"15\" text-anchor=\"end\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            legend_x, s.color, s.label
        ));
        legend_x -= 10.0 + 7.0 * s.label.len() as f64;
    }

    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));

    for (value, y) in [
        (max_v, MARGIN_TOP + 5.0),
        ((max_v + min_v) / 2.0, MARGIN_TOP + plot_height / 2.0),
        (min_v, CHART_HEIGHT - MARGIN_BOTTOM - 5.0),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            y,
            value
        ));
    }

    let mid = dates.len() / 2;
    for (x, date) in [
        (MARGIN_LEFT, dates[0]),
        (MARGIN_LEFT + plot_width / 2.0, dates[mid]),
        (CHART_WIDTH - MARGIN_RIGHT, dates[dates.len() - 1]),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            x, CHART_HEIGHT, date
        ));
    }

    for &g in guides {
        let y = y_scale(g);
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"#999\" stroke-dasharray=\"4 3\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT,
            y,
            CHART_WIDTH - MARGIN_RIGHT,
            y
        ));
    }

    for s in series {
        let path = path_data(&s.values, &x_scale, &y_scale);
        if path.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
            path, s.color
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn path_data(
    values: &[Option<f64>],
    x_scale: &dyn Fn(usize) -> f64,
    y_scale: &dyn Fn(f64) -> f64,
) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(v) if v.is_finite() => {
                let cmd = if pen_down { " L" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i), y_scale(*v)));
                pen_down = true;
            }
            _ => pen_down = false,
        }
    }
    path.trim_start().to_string()
}

/// The four charts shown per ticker: price with SMAs, RSI, MACD, ADX.
pub struct TickerCharts {
    pub price: String,
    pub rsi: String,
    pub macd: String,
    pub adx: String,
}

pub fn ticker_charts(td: &TickerData) -> TickerCharts {
    let dates: Vec<NaiveDate> = td.ohlcv.iter().map(|b| b.date).collect();
    let column = |c: Column| -> Vec<Option<f64>> {
        (0..td.bar_count()).map(|i| td.value(c, i)).collect()
    };

    TickerCharts {
        price: generate_line_svg(
            &format!("{} Close / SMA", td.ticker),
            &dates,
            &[
                LineSeries {
                    label: "Close",
                    color: "#2563eb",
                    values: td.ohlcv.iter().map(|b| Some(b.close)).collect(),
                },
                LineSeries {
                    label: "SMA_10",
                    color: "#f59e0b",
                    values: column(Column::Sma10),
                },
                LineSeries {
                    label: "SMA_50",
                    color: "#dc2626",
                    values: column(Column::Sma50),
                },
            ],
            &[],
        ),
        rsi: generate_line_svg(
            "RSI",
            &dates,
            &[LineSeries {
                label: "RSI",
                color: "#7c3aed",
                values: column(Column::Rsi),
            }],
            &[30.0, 70.0],
        ),
        macd: generate_line_svg(
            "MACD",
            &dates,
            &[LineSeries {
                label: "MACD",
                color: "#059669",
                values: column(Column::Macd),
            }],
            &[0.0],
        ),
        adx: generate_line_svg(
            "ADX",
            &dates,
            &[LineSeries {
                label: "ADX",
                color: "#b45309",
                values: column(Column::Adx),
            }],
            &[25.0],
        ),
    }
}
