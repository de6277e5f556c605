//! Matchup report generation.
//!
//! Renders grouped multipliers as one line per bucket: a
//! `Loss x{m}` / `Win x{m}` label followed by one badge per type.

use crate::config::{OutputFormat, ReportConfig};
use crate::models::{DamageRelations, Direction, Multiplier};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A computed matchup ready for rendering.
#[derive(Debug, Clone)]
pub struct MatchupReport {
    /// Queried type names, as sent to the source.
    pub types: Vec<String>,
    /// When the matchup was computed.
    pub generated_at: DateTime<Utc>,
    /// Aggregated multipliers.
    pub relations: DamageRelations,
}

impl MatchupReport {
    pub fn new(types: Vec<String>, relations: DamageRelations) -> Self {
        Self {
            types,
            generated_at: Utc::now(),
            relations,
        }
    }
}

/// Render a report in the configured format.
pub fn render_report(report: &MatchupReport, config: &ReportConfig) -> Result<String> {
    Ok(match config.format {
        OutputFormat::Text => generate_text_report(report, config),
        OutputFormat::Markdown => generate_markdown_report(report, config),
        OutputFormat::Html => generate_html_report(report, config),
        OutputFormat::Json => generate_json_report(report)?,
    })
}

/// Type name as shown on a badge: first letter upper-cased, rest lower.
pub fn display_name(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Sprite URL of a type badge.
pub fn badge_url(config: &ReportConfig, type_name: &str) -> String {
    format!(
        "{}/{}.png",
        config.badge_base_url.trim_end_matches('/'),
        display_name(type_name)
    )
}

/// Line label for a bucket, e.g. `Loss x2`.
pub fn bucket_label(config: &ReportConfig, direction: Direction, multiplier: Multiplier) -> String {
    let label = match direction {
        Direction::From => &config.loss_label,
        Direction::To => &config.win_label,
    };
    format!("{} x{}", label, multiplier)
}

/// Buckets of both directions in report order: all received first.
fn buckets(relations: &DamageRelations) -> impl Iterator<Item = (Direction, Multiplier, &[String])> {
    Direction::ALL.into_iter().flat_map(move |direction| {
        relations
            .get(direction)
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(move |(multiplier, names)| (direction, *multiplier, names.as_slice()))
    })
}

fn queried_types(report: &MatchupReport) -> String {
    report
        .types
        .iter()
        .map(|t| display_name(t))
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Generate a plain text report.
pub fn generate_text_report(report: &MatchupReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", queried_types(report)));

    if report.relations.is_empty() {
        output.push_str("No type deals or takes non-neutral damage.\n");
        return output;
    }

    for (direction, multiplier, names) in buckets(&report.relations) {
        let badges: Vec<String> = names.iter().map(|n| display_name(n)).collect();
        output.push_str(&format!(
            "{}: {}\n",
            bucket_label(config, direction, multiplier),
            badges.join(" ")
        ));
    }

    output
}

/// Generate a Markdown report with badge images.
pub fn generate_markdown_report(report: &MatchupReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Type Matchup: {}\n\n", queried_types(report)));
    output.push_str(&format!(
        "*Generated {}*\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for direction in Direction::ALL {
        let heading = match direction {
            Direction::From => "Damage Taken",
            Direction::To => "Damage Dealt",
        };
        output.push_str(&format!("## {}\n\n", heading));

        let groups = report.relations.get(direction);
        if groups.is_empty() {
            output.push_str("No non-neutral multipliers.\n\n");
            continue;
        }

        for (multiplier, names) in groups {
            let badges: Vec<String> = names
                .iter()
                .map(|n| format!("![{}]({})", display_name(n), badge_url(config, n)))
                .collect();
            output.push_str(&format!(
                "- **{}:** {}\n",
                bucket_label(config, direction, *multiplier),
                badges.join(" ")
            ));
        }
        output.push('\n');
    }

    output
}

/// Generate an HTML fragment: one paragraph per bucket.
pub fn generate_html_report(report: &MatchupReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    for (direction, multiplier, names) in buckets(&report.relations) {
        output.push_str("<p><small>");
        output.push_str(&escape_html(&bucket_label(config, direction, multiplier)));
        output.push_str(": </small>");
        for name in names {
            output.push_str(&badge_img(config, name));
        }
        output.push_str("</p>\n");
    }

    output
}

fn badge_img(config: &ReportConfig, type_name: &str) -> String {
    format!(
        r#"<img alt="{}" src="{}" width="{}" height="{}" class="pixelated">"#,
        escape_html(&display_name(type_name)),
        escape_html(&badge_url(config, type_name)),
        config.badge_width,
        config.badge_height
    )
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Serialize)]
struct JsonBucket<'a> {
    multiplier: Multiplier,
    types: &'a [String],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    types: &'a [String],
    generated_at: DateTime<Utc>,
    from: Vec<JsonBucket<'a>>,
    to: Vec<JsonBucket<'a>>,
}

/// Generate a JSON report.
///
/// Buckets are arrays rather than objects so multiplier order survives.
pub fn generate_json_report(report: &MatchupReport) -> Result<String> {
    let json = JsonReport {
        types: &report.types,
        generated_at: report.generated_at,
        from: json_buckets(&report.relations, Direction::From),
        to: json_buckets(&report.relations, Direction::To),
    };

    serde_json::to_string_pretty(&json).map_err(Into::into)
}

fn json_buckets(relations: &DamageRelations, direction: Direction) -> Vec<JsonBucket<'_>> {
    relations
        .get(direction)
        .iter()
        .map(|(multiplier, names)| JsonBucket {
            multiplier: *multiplier,
            types: names,
        })
        .collect()
}
