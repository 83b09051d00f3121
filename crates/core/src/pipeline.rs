use crate::domain::keywords::DigestConfig;
use crate::error::DigestError;
use crate::ingest::provider::{fetch_keywords, TrendProvider};
use crate::notify::Notifier;
use crate::report::{build_report, join_sections, render_section, Locale};
use anyhow::Context;
use chrono::NaiveDate;

/// Fetches, builds and renders every group in declared order and joins the
/// sections. Fails on the first group that cannot be reported.
pub async fn compose_digest(
    provider: &dyn TrendProvider,
    config: &DigestConfig,
    end_date: NaiveDate,
    locale: Locale,
) -> anyhow::Result<String> {
    if config.start_date > end_date {
        return Err(DigestError::config(format!(
            "start date {} is after end date {end_date}",
            config.start_date
        ))
        .into());
    }

    let mut sections = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let response = fetch_keywords(provider, &group.keywords, config.start_date, end_date)
            .await
            .with_context(|| format!("fetching group {:?} failed", group.title))?;

        let report = build_report(&response, &group.keywords)
            .with_context(|| format!("building report for group {:?} failed", group.title))?;

        tracing::info!(
            group = %group.title,
            keywords = group.keywords.len(),
            date_d_2 = %report.date_d_2,
            date_d_1 = %report.date_d_1,
            "group report built"
        );
        sections.push(render_section(&report, locale));
    }

    Ok(join_sections(&sections))
}

/// Composes the digest and sends it once. Nothing is sent if any group fails.
pub async fn run_digest(
    provider: &dyn TrendProvider,
    notifier: &dyn Notifier,
    config: &DigestConfig,
    end_date: NaiveDate,
    locale: Locale,
) -> anyhow::Result<String> {
    let text = compose_digest(provider, config, end_date, locale).await?;

    notifier
        .send_text(&text)
        .await
        .with_context(|| format!("sending digest via {} failed", notifier.channel_name()))?;

    tracing::info!(
        channel = notifier.channel_name(),
        groups = config.groups.len(),
        "digest delivered"
    );
    Ok(text)
}
