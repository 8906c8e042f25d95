//! HTML rendering of the page model.
//!
//! Chart specs are embedded as inline JSON and drawn in the browser by
//! plotly.js (candlestick) and vega-embed (bars).

use askama::Template;
use serde::Serialize;

use crate::dashboard::page::ToggleOption;
use crate::dashboard::{DashboardPage, Section};
use crate::error::AppError;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub title: &'a str,
    pub symbol_label: &'a str,
    pub symbol_value: &'a str,
    pub prompt: Option<&'a str>,
    pub company: Option<SectionView<'a>>,
    pub chart: Option<SectionView<'a>>,
    pub financials: Option<FinancialsView<'a>>,
}

/// A section reduced to what the template prints.
pub struct SectionView<'a> {
    pub heading: &'a str,
    pub lines: Vec<&'a str>,
    /// Chart spec, already serialized for a `<script>` block.
    pub spec: Option<String>,
    pub error: Option<&'a str>,
}

pub struct FinancialsView<'a> {
    pub heading: &'a str,
    pub period_label: &'a str,
    pub options: &'a [ToggleOption],
    pub revenue_spec: Option<String>,
    pub net_income_spec: Option<String>,
    pub error: Option<&'a str>,
}

impl<'a> DashboardTemplate<'a> {
    pub fn new(page: &'a DashboardPage) -> Result<Self, AppError> {
        let company = page.company.as_ref().map(|section| match section {
            Section::Ready(company) => SectionView {
                heading: company.heading,
                lines: company.lines.iter().map(String::as_str).collect(),
                spec: None,
                error: None,
            },
            Section::Unavailable { message } => {
                SectionView::unavailable(crate::dashboard::page::COMPANY_HEADING, message)
            }
        });

        let chart = match &page.chart {
            Some(Section::Ready(chart)) => Some(SectionView {
                heading: chart.heading,
                lines: Vec::new(),
                spec: Some(script_json(&chart.candlestick)?),
                error: None,
            }),
            Some(Section::Unavailable { message }) => Some(SectionView::unavailable(
                crate::dashboard::page::CHART_HEADING,
                message,
            )),
            None => None,
        };

        let financials = match &page.financials {
            Some(section) => {
                let (revenue_spec, net_income_spec) = match &section.charts {
                    Section::Ready(charts) => (
                        Some(script_json(&charts.revenue)?),
                        Some(script_json(&charts.net_income)?),
                    ),
                    Section::Unavailable { .. } => (None, None),
                };
                Some(FinancialsView {
                    heading: section.heading,
                    period_label: section.toggle.label,
                    options: &section.toggle.options,
                    revenue_spec,
                    net_income_spec,
                    error: section.charts.unavailable_message(),
                })
            }
            None => None,
        };

        Ok(Self {
            title: page.title,
            symbol_label: page.symbol_input.label,
            symbol_value: &page.symbol_input.value,
            prompt: page.prompt.as_deref(),
            company,
            chart,
            financials,
        })
    }
}

impl<'a> SectionView<'a> {
    fn unavailable(heading: &'a str, message: &'a str) -> Self {
        Self {
            heading,
            lines: Vec::new(),
            spec: None,
            error: Some(message),
        }
    }
}

/// JSON safe to place inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("chart spec serialization failed: {e}")))?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_json_cannot_close_the_script_element() {
        let json = script_json(&"</script><script>alert(1)</script>").expect("serializes");
        assert!(!json.contains("</script>"));
        assert_eq!(
            serde_json::from_str::<String>(&json).expect("still valid json"),
            "</script><script>alert(1)</script>"
        );
    }
}
