//! Pre-formatted view of a `ScanResult` shared by the HTML report and the
//! web dashboard templates.

use crate::adapters::chart_svg::ticker_charts;
use crate::adapters::console_report::TAIL_ROWS;
use crate::domain::indicator_helpers::Column;
use crate::domain::scan::ScanResult;

pub struct PriceRowView {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
}

pub struct IndicatorRowView {
    pub date: String,
    pub cells: Vec<String>,
}

pub struct RankedView {
    pub rank: usize,
    pub ticker: String,
    pub date: String,
    pub close: String,
    pub score: String,
    pub rsi: String,
    pub macd: String,
    pub sma_spread: String,
    pub adx: String,
    pub rvol: String,
}

pub struct NoteView {
    pub ticker: String,
    pub reason: String,
}

pub struct ChartsView {
    pub ticker: String,
    pub price_svg: String,
    pub rsi_svg: String,
    pub macd_svg: String,
    pub adx_svg: String,
}

pub struct ReportView {
    pub index_name: String,
    pub index_symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub roe_threshold: String,
    pub de_threshold: String,
    pub price_rows: Vec<PriceRowView>,
    pub indicator_headers: Vec<&'static str>,
    pub indicator_rows: Vec<IndicatorRowView>,
    pub ranked: Vec<RankedView>,
    pub excluded: Vec<NoteView>,
    pub unscored: Vec<String>,
    pub skipped: Vec<NoteView>,
    pub charts: Vec<ChartsView>,
}

fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

impl ReportView {
    pub fn from_result(result: &ScanResult) -> Self {
        let index = &result.index_data;

        let price_rows = index
            .tail(TAIL_ROWS)
            .iter()
            .map(|b| PriceRowView {
                date: b.date.to_string(),
                open: fmt2(b.open),
                high: fmt2(b.high),
                low: fmt2(b.low),
                close: fmt2(b.close),
                volume: b.volume,
            })
            .collect();

        let indicator_rows = index
            .tail_rows(TAIL_ROWS)
            .iter()
            .map(|row| IndicatorRowView {
                date: row.date.to_string(),
                cells: Column::ALL
                    .iter()
                    .map(|&c| row.get(c).map(fmt2).unwrap_or_else(|| "-".to_string()))
                    .collect(),
            })
            .collect();

        let ranked = result
            .ranking
            .top
            .iter()
            .map(|r| RankedView {
                rank: r.rank,
                ticker: r.ticker.clone(),
                date: r.date.to_string(),
                close: fmt2(r.close),
                score: fmt2(r.score),
                rsi: fmt2(r.components.rsi),
                macd: fmt2(r.components.macd),
                sma_spread: fmt2(r.components.sma_spread),
                adx: fmt2(r.components.adx),
                rvol: fmt2(r.components.rvol),
            })
            .collect();

        let charts = result
            .top_tickers()
            .into_iter()
            .map(|td| {
                let c = ticker_charts(td);
                ChartsView {
                    ticker: td.ticker.clone(),
                    price_svg: c.price,
                    rsi_svg: c.rsi,
                    macd_svg: c.macd,
                    adx_svg: c.adx,
                }
            })
            .collect();

        Self {
            index_name: result.index.name.to_string(),
            index_symbol: result.index.symbol.to_string(),
            start_date: result.start_date.to_string(),
            end_date: result.end_date.to_string(),
            roe_threshold: result.filter.roe_threshold.to_string(),
            de_threshold: result.filter.debt_to_equity_threshold.to_string(),
            price_rows,
            indicator_headers: Column::ALL.iter().map(|c| c.header()).collect(),
            indicator_rows,
            ranked,
            excluded: result
                .filtered
                .excluded
                .iter()
                .map(|e| NoteView {
                    ticker: e.ticker.clone(),
                    reason: e.reason.to_string(),
                })
                .collect(),
            unscored: result.ranking.unscored.clone(),
            skipped: result
                .skipped
                .iter()
                .map(|s| NoteView {
                    ticker: s.ticker.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            charts,
        }
    }
}
