use crate::report::builder::BatchReport;
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

pub const SECTION_SEPARATOR_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    fn status_header(self, date: NaiveDate) -> String {
        match self {
            Locale::Ko => format!("{}월 {}일 검색 현황", date.month(), date.day()),
            Locale::En => format!("{} search status", date.format("%B %-d")),
        }
    }

    fn direction(self, increase: bool) -> &'static str {
        match (self, increase) {
            (Locale::Ko, true) => "증가",
            (Locale::Ko, false) => "감소",
            (Locale::En, true) => "increase",
            (Locale::En, false) => "decrease",
        }
    }

    fn change_unavailable(self) -> &'static str {
        match self {
            Locale::Ko => "변화율 계산 불가",
            Locale::En => "change rate unavailable",
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            other => anyhow::bail!("unsupported locale {other:?} (expected ko or en)"),
        }
    }
}

/// Renders one batch: the `d_2` header and values, a blank line, then the `d_1`
/// header with values and change against `d_2`.
pub fn render_section(report: &BatchReport, locale: Locale) -> String {
    let mut lines = Vec::with_capacity(report.records.len() * 2 + 3);

    lines.push(locale.status_header(report.date_d_2));
    for rec in &report.records {
        lines.push(format!("{} : {}", rec.keyword, format_ratio(rec.ratio_d_2)));
    }

    lines.push(String::new());

    lines.push(locale.status_header(report.date_d_1));
    for rec in &report.records {
        let change = match rec.pct_change {
            Some(pct) => {
                let pct = pct.round_ties_even();
                format!("{}% {}", pct.abs() as i64, locale.direction(pct >= 0.0))
            }
            None => locale.change_unavailable().to_string(),
        };
        lines.push(format!(
            "{} : {} ({})",
            rec.keyword,
            format_ratio(rec.ratio_d_1),
            change
        ));
    }

    lines.join("\n")
}

pub fn section_separator() -> String {
    format!("\n\n{}\n\n", "-".repeat(SECTION_SEPARATOR_WIDTH))
}

pub fn join_sections(sections: &[String]) -> String {
    sections.join(&section_separator())
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// Shortest decimal form, always with a fractional part: 20 -> "20.0", 12.345 -> "12.34".
fn format_ratio(ratio: Option<f64>) -> String {
    let Some(ratio) = ratio else {
        return "-".to_string();
    };

    let rounded = round_to_cents(ratio);
    let s = rounded.to_string();
    if rounded.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}
