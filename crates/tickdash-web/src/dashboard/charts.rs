//! Chart specifications handed to the browser.
//!
//! The candlestick is a Plotly figure and the financial bars are Vega-Lite
//! specs. Both serialize to the JSON the respective JavaScript libraries
//! accept, so the server decides everything about a chart except drawing it.

use serde::Serialize;
use serde_json::{Map, Value};
use tickdash_core::{FinancialsRow, PriceHistory};

use super::period::PeriodSelection;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub const REVENUE_COLOR: &str = "red";
pub const NET_INCOME_COLOR: &str = "orange";

/// Plotly candlestick figure: one trace, one candle per price row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickFigure {
    pub data: [CandlestickTrace; 1],
    pub layout: CandlestickLayout,
    pub config: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    /// ISO dates, in the order the rows were fetched.
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickLayout {
    pub autosize: bool,
    pub xaxis: CandlestickAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickAxis {
    pub title: &'static str,
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlotConfig {
    pub responsive: bool,
}

impl CandlestickFigure {
    pub fn trace(&self) -> &CandlestickTrace {
        &self.data[0]
    }
}

/// Candlestick keyed by `Date`, range slider hidden, sized to its container.
pub fn candlestick(history: &PriceHistory) -> CandlestickFigure {
    let bars = &history.bars;
    CandlestickFigure {
        data: [CandlestickTrace {
            kind: "candlestick",
            name: history.symbol.to_string(),
            x: bars.iter().map(|bar| bar.date.to_string()).collect(),
            open: bars.iter().map(|bar| bar.open).collect(),
            high: bars.iter().map(|bar| bar.high).collect(),
            low: bars.iter().map(|bar| bar.low).collect(),
            close: bars.iter().map(|bar| bar.close).collect(),
        }],
        layout: CandlestickLayout {
            autosize: true,
            xaxis: CandlestickAxis {
                title: "Date",
                rangeslider: RangeSlider { visible: false },
            },
        },
        config: PlotConfig { responsive: true },
    }
}

/// Vega-Lite v5 bar chart with an ordinal x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub width: &'static str,
    pub data: InlineData,
    pub mark: BarMark,
    pub encoding: BarEncoding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarMark {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarEncoding {
    pub x: FieldEncoding,
    pub y: FieldEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEncoding {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl BarChartSpec {
    /// X-axis categories in data order.
    pub fn categories(&self) -> Vec<&str> {
        let field = self.encoding.x.field.as_str();
        self.data
            .values
            .iter()
            .filter_map(|datum| datum.get(field).and_then(Value::as_str))
            .collect()
    }

    /// Bar heights in data order; `None` where the statement has no figure.
    pub fn measures(&self) -> Vec<Option<f64>> {
        let field = self.encoding.y.field.as_str();
        self.data
            .values
            .iter()
            .map(|datum| datum.get(field).and_then(Value::as_f64))
            .collect()
    }
}

/// One bar per reporting period, labelled for `selection`, measuring `line_item`.
pub fn financial_bars(
    rows: &[FinancialsRow],
    selection: PeriodSelection,
    line_item: &str,
    color: &'static str,
) -> BarChartSpec {
    let axis = selection.axis_field();
    let values = rows
        .iter()
        .map(|row| {
            let mut datum = Map::new();
            datum.insert(
                axis.to_owned(),
                Value::String(selection.period_label(&row.period)),
            );
            datum.insert(
                line_item.to_owned(),
                row.value(line_item).map_or(Value::Null, Value::from),
            );
            datum
        })
        .collect();

    BarChartSpec {
        schema: VEGA_LITE_SCHEMA,
        width: "container",
        data: InlineData { values },
        mark: BarMark {
            kind: "bar",
            color,
        },
        encoding: BarEncoding {
            x: FieldEncoding {
                field: axis.to_owned(),
                kind: "ordinal",
            },
            y: FieldEncoding {
                field: line_item.to_owned(),
                kind: "quantitative",
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;
    use tickdash_core::{PriceBar, Symbol, NET_INCOME, TOTAL_REVENUE};

    use super::*;

    fn row(period: &str, revenue: Option<f64>, net_income: Option<f64>) -> FinancialsRow {
        FinancialsRow {
            period: period.to_owned(),
            values: BTreeMap::from([
                (TOTAL_REVENUE.to_owned(), revenue),
                (NET_INCOME.to_owned(), net_income),
            ]),
        }
    }

    #[test]
    fn candlestick_hides_range_slider_and_keeps_row_order() {
        let history = PriceHistory::new(
            Symbol::parse("AAPL").expect("symbol"),
            vec![
                PriceBar {
                    date: time::macros::date!(2024 - 01 - 01),
                    open: 1.0,
                    high: 3.0,
                    low: 0.5,
                    close: 2.0,
                    volume: None,
                },
                PriceBar {
                    date: time::macros::date!(2024 - 01 - 08),
                    open: 2.0,
                    high: 4.0,
                    low: 1.5,
                    close: 3.5,
                    volume: Some(10),
                },
            ],
        );

        let figure = candlestick(&history);
        let encoded = serde_json::to_value(&figure).expect("serializes");

        assert_eq!(figure.trace().x, vec!["2024-01-01", "2024-01-08"]);
        assert_eq!(figure.trace().close, vec![2.0, 3.5]);
        assert_eq!(encoded["data"][0]["type"], json!("candlestick"));
        assert_eq!(encoded["layout"]["xaxis"]["rangeslider"]["visible"], json!(false));
        assert_eq!(encoded["config"]["responsive"], json!(true));
    }

    #[test]
    fn annual_bars_use_year_axis() {
        let rows = vec![
            row("2023-09-30", Some(383.3), Some(97.0)),
            row("2022-09-30", Some(394.3), None),
        ];

        let spec = financial_bars(&rows, PeriodSelection::Annual, NET_INCOME, NET_INCOME_COLOR);
        let encoded = serde_json::to_value(&spec).expect("serializes");

        assert_eq!(spec.categories(), vec!["2023", "2022"]);
        assert_eq!(spec.measures(), vec![Some(97.0), None]);
        assert_eq!(encoded["$schema"], json!(VEGA_LITE_SCHEMA));
        assert_eq!(encoded["width"], json!("container"));
        assert_eq!(encoded["mark"], json!({ "type": "bar", "color": "orange" }));
        assert_eq!(
            encoded["encoding"]["x"],
            json!({ "field": "Year", "type": "ordinal" })
        );
        assert_eq!(
            encoded["encoding"]["y"],
            json!({ "field": "Net Income", "type": "quantitative" })
        );
    }

    #[test]
    fn quarterly_bars_keep_period_text() {
        let rows = vec![row("2024-03-31", Some(90.7), Some(23.6))];

        let spec = financial_bars(
            &rows,
            PeriodSelection::Quarterly,
            TOTAL_REVENUE,
            REVENUE_COLOR,
        );

        assert_eq!(spec.categories(), vec!["2024-03-31"]);
        assert_eq!(spec.encoding.x.field, "Quarter");
        assert_eq!(spec.mark.color, "red");
    }
}
