use chrono::NaiveDate;
use serde_json::Value;

use super::descriptor::DocumentCheckKind;
use super::mapping::{self, MISSING_FIELD_PLACEHOLDER};

/// Compliance string the backend uses for an approved check.
pub const APPROVED_STATUS: &str = "genehmigt";
/// Compliance string the backend uses for a rejected check.
pub const REJECTED_STATUS: &str = "abgelehnt";

/// Sub-check issue value meaning "no issues found".
const NO_ISSUES_SENTINEL: &str = "no any";
/// `overall_status` value for a compliant per-check result.
const OVERALL_COMPLIANT: &str = "compliant";

/// Normalized compliance verdict. Exactly one is derivable from any payload
/// shape; `Pending` means the response carried no compliance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
    Pending,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Approved => APPROVED_STATUS,
            Verdict::Rejected => REJECTED_STATUS,
            Verdict::Pending => "ausstehend",
        }
    }

    /// Status badge text as the portal renders it.
    pub const fn status_text(self) -> &'static str {
        match self {
            Verdict::Approved => "Abgeschlossen",
            Verdict::Rejected => "Abgelehnt",
            Verdict::Pending => "Ausstehend",
        }
    }

    /// Whether this verdict moves the view to the report.
    pub const fn is_recognized(self) -> bool {
        matches!(self, Verdict::Approved | Verdict::Rejected)
    }
}

/// A display label paired with its (possibly placeholder) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

/// One piece of the segmented issue text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSegment {
    Heading(String),
    Bullet(String),
}

/// Stable display model derived from a raw analysis response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub kind: DocumentCheckKind,
    pub verdict: Verdict,
    pub issues: Vec<String>,
    pub overview: Vec<DisplayField>,
    pub summary: Vec<DisplayField>,
    pub checked_on: NaiveDate,
}

impl AnalysisReport {
    /// Heading/bullet segmentation of the aggregated issue text. Best-effort
    /// heuristic over backend free text, not a grammar.
    pub fn issue_segments(&self) -> Vec<IssueSegment> {
        segment_issue_text(&self.issues.join(", "))
    }

    pub fn checked_on_label(&self) -> String {
        self.checked_on.format("%d.%m.%Y").to_string()
    }
}

/// Map a raw portal response onto the display model. Total: malformed or
/// missing pieces degrade to placeholders and a `Pending` verdict, never an
/// error.
pub fn normalize(kind: DocumentCheckKind, raw: &Value, checked_on: NaiveDate) -> AnalysisReport {
    let (verdict, issues) = resolve_verdict(raw);
    let result_data = raw
        .get("analysis_result")
        .and_then(|analysis| analysis.get("result_data"))
        .and_then(Value::as_object);

    let overview = display_fields(mapping::overview_labels(kind), result_data);
    let mut summary = display_fields(mapping::summary_labels(kind), result_data);
    summary.push(DisplayField {
        label: "Prüfdatum",
        value: checked_on.format("%d.%m.%Y").to_string(),
    });

    AnalysisReport {
        kind,
        verdict,
        issues,
        overview,
        summary,
        checked_on,
    }
}

fn display_fields(
    labels: &'static [mapping::FieldLabel],
    result_data: Option<&serde_json::Map<String, Value>>,
) -> Vec<DisplayField> {
    let normalized: Vec<(String, String)> = result_data
        .map(|data| {
            data.iter()
                .filter_map(|(key, value)| {
                    field_value(value).map(|text| (mapping::normalize_key(key), text))
                })
                .collect()
        })
        .unwrap_or_default();

    labels
        .iter()
        .map(|entry| {
            let value = normalized
                .iter()
                .find(|(key, _)| key == entry.backend_key)
                .map(|(_, text)| text.clone())
                .unwrap_or_else(|| MISSING_FIELD_PLACEHOLDER.to_string());
            DisplayField {
                label: entry.label,
                value,
            }
        })
        .collect()
}

fn field_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Resolve the two backend shapes, a flat compliance string or a per-check
/// object, into one verdict plus the aggregated issue list.
fn resolve_verdict(raw: &Value) -> (Verdict, Vec<String>) {
    if let Some(status) = raw.get("compliance_status").and_then(Value::as_str) {
        let verdict = if status == APPROVED_STATUS {
            Verdict::Approved
        } else {
            Verdict::Rejected
        };
        let issues = raw
            .get("non_compliant_details")
            .and_then(Value::as_str)
            .filter(|details| !details.trim().is_empty())
            .map(|details| vec![details.to_string()])
            .unwrap_or_default();
        return (verdict, issues);
    }

    if let Some(result) = raw.get("result").and_then(Value::as_object) {
        let mut issues = Vec::new();
        for (key, value) in result {
            if key == "overall_status" {
                continue;
            }
            if let Some(check) = value.as_object() {
                collect_issues(check.get("issues"), &mut issues);
            }
        }

        let verdict = match result.get("overall_status").and_then(Value::as_str) {
            Some(status) if status == OVERALL_COMPLIANT => Verdict::Approved,
            Some(_) => Verdict::Rejected,
            None if issues.is_empty() => Verdict::Approved,
            None => Verdict::Rejected,
        };
        return (verdict, issues);
    }

    (Verdict::Pending, Vec::new())
}

fn collect_issues(issues: Option<&Value>, out: &mut Vec<String>) {
    match issues {
        Some(Value::String(text)) => push_issue(text, out),
        Some(Value::Array(items)) => {
            for item in items {
                if let Some(text) = item.as_str() {
                    push_issue(text, out);
                }
            }
        }
        _ => {}
    }
}

fn push_issue(text: &str, out: &mut Vec<String>) {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_ISSUES_SENTINEL) {
        return;
    }
    out.push(trimmed.to_string());
}

/// Split free-form issue text on the backend's `.`/`,` delimiters; a segment
/// ending in a colon becomes a heading, everything else a bullet.
pub fn segment_issue_text(text: &str) -> Vec<IssueSegment> {
    text.split(['.', ','])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_suffix(':') {
            Some(heading) => IssueSegment::Heading(heading.trim().to_string()),
            None => IssueSegment::Bullet(segment.to_string()),
        })
        .collect()
}
