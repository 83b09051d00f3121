use crate::error::DigestError;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_START_DATE: &str = "2026-01-01";

/// A named set of keywords rendered together as one report section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordGroup {
    pub title: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(title: &str, keywords: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Immutable run configuration. Groups are reported in declaration order.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub start_date: NaiveDate,
    pub groups: Vec<KeywordGroup>,
}

impl DigestConfig {
    pub fn builtin() -> anyhow::Result<Self> {
        let start_date = NaiveDate::parse_from_str(DEFAULT_START_DATE, "%Y-%m-%d")
            .context("invalid built-in start date")?;
        Ok(Self {
            start_date,
            groups: builtin_groups(),
        })
    }

    /// Built-in groups, optionally replaced by `DIGEST_GROUPS_PATH` and with the
    /// start date overridden by `DIGEST_START_DATE`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut out = Self::builtin()?;

        if let Some(s) = non_empty_env("DIGEST_START_DATE") {
            out.start_date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                DigestError::config(format!("DIGEST_START_DATE must be YYYY-MM-DD (got {s:?})"))
            })?;
        }

        if let Some(path) = non_empty_env("DIGEST_GROUPS_PATH") {
            let text = std::fs::read_to_string(&path).map_err(|err| {
                DigestError::config(format!("failed to read DIGEST_GROUPS_PATH={path}: {err}"))
            })?;
            out.groups = parse_groups_json(&text)
                .with_context(|| format!("invalid keyword groups in {path}"))?;
        }

        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.groups.is_empty() {
            return Err(DigestError::config("at least one keyword group is required").into());
        }

        for group in &self.groups {
            validate_group(group)?;
        }
        Ok(())
    }

    pub fn keyword_count(&self) -> usize {
        self.groups.iter().map(|g| g.keywords.len()).sum()
    }
}

pub fn parse_groups_json(text: &str) -> anyhow::Result<Vec<KeywordGroup>> {
    let groups: Vec<KeywordGroup> = serde_json::from_str(text)
        .map_err(|err| DigestError::config(format!("keyword groups JSON: {err}")))?;
    for group in &groups {
        validate_group(group)?;
    }
    Ok(groups)
}

fn validate_group(group: &KeywordGroup) -> anyhow::Result<()> {
    let title = group.title.trim();
    if title.is_empty() {
        return Err(DigestError::config("keyword group title must be non-empty").into());
    }
    if group.keywords.is_empty() {
        return Err(DigestError::config(format!("group {title:?} has no keywords")).into());
    }

    // Keywords double as result titles, so they must be unique within a group.
    let mut seen = HashSet::new();
    for keyword in &group.keywords {
        if keyword.trim().is_empty() {
            return Err(
                DigestError::config(format!("group {title:?} has a blank keyword")).into(),
            );
        }
        if !seen.insert(keyword.as_str()) {
            return Err(DigestError::config(format!(
                "group {title:?} lists keyword {keyword:?} more than once"
            ))
            .into());
        }
    }
    Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn builtin_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "경쟁사 그룹",
            &["아이코스", "릴하이브리드", "글로전자담배", "레딜전자담배", "하카"],
        ),
        KeywordGroup::new("자사 그룹", &["하카", "하카전담", "하카매장", "하카전자담배"]),
        KeywordGroup::new(
            "시장 그룹",
            &["전자담배액상", "편의점전자담배", "궐련형전자담배", "무니코틴전자담배"],
        ),
        KeywordGroup::new("H2 그룹", &["하카신제품", "하카H", "하카궐련형", "하카H2", "HAKAH2"]),
    ]
}
