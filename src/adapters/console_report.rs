//! Plain-text tables for the `scan` command.

use crate::domain::indicator_helpers::Column;
use crate::domain::scan::ScanResult;
use crate::domain::ticker_data::TickerData;
use std::fmt::Write;

pub const TAIL_ROWS: usize = 10;

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_price_table(td: &TickerData, rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in td.tail(rows) {
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }
    out
}

pub fn format_indicator_table(td: &TickerData, rows: usize) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<12}", "Date");
    for column in Column::ALL {
        let _ = write!(out, " {:>10}", column.header());
    }
    out.push('\n');
    for row in td.tail_rows(rows) {
        let _ = write!(out, "{:<12}", row.date);
        for column in Column::ALL {
            let _ = write!(out, " {:>10}", fmt_opt(row.get(column)));
        }
        out.push('\n');
    }
    out
}

pub fn format_scan_result(result: &ScanResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Stock Data for {}", result.index.name);
    out.push_str(&format_price_table(&result.index_data, TAIL_ROWS));

    let _ = writeln!(out, "\nMomentum Indicators");
    out.push_str(&format_indicator_table(&result.index_data, TAIL_ROWS));

    let _ = writeln!(
        out,
        "\nQuality filter: ROE > {} and Debt/Equity < {}",
        result.filter.roe_threshold, result.filter.debt_to_equity_threshold
    );

    let _ = writeln!(out, "\nTop {} Momentum Stocks", result.ranking.top.len());
    if result.ranking.top.is_empty() {
        let _ = writeln!(out, "  (no ticker passed the filters)");
    } else {
        let _ = writeln!(
            out,
            "{:>4}  {:<16} {:<12} {:>12} {:>14}",
            "Rank", "Ticker", "Date", "Close", "Momentum_Score"
        );
        for r in &result.ranking.top {
            let _ = writeln!(
                out,
                "{:>4}  {:<16} {:<12} {:>12.2} {:>14.2}",
                r.rank, r.ticker, r.date, r.close, r.score
            );
        }
    }

    if !result.filtered.excluded.is_empty() {
        let _ = writeln!(out, "\nFiltered out");
        for ex in &result.filtered.excluded {
            let _ = writeln!(out, "  {:<16} {}", ex.ticker, ex.reason);
        }
    }

    if !result.ranking.unscored.is_empty() {
        let _ = writeln!(out, "\nNot scored");
        for ticker in &result.ranking.unscored {
            let _ = writeln!(out, "  {:<16} incomplete indicator row", ticker);
        }
    }

    if !result.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped");
        for s in &result.skipped {
            let _ = writeln!(out, "  {:<16} {}", s.ticker, s.reason);
        }
    }

    out
}
