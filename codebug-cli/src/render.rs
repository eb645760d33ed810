//! Plain-text rendering of an analysis report.

use code_analyzer::{AnalysisReport, Issue};
use colored::Colorize;

const RULE_WIDTH: usize = 40;

/// Renders `report` as the human-readable text report.
///
/// With `color` the status line is highlighted; the text is otherwise identical.
pub fn render_report(report: &AnalysisReport, color: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    let status = if report.ok {
        "Status: OK"
    } else {
        "Status: ISSUES FOUND"
    };
    lines.push(match (color, report.ok) {
        (false, _) => status.to_string(),
        (true, true) => status.green().bold().to_string(),
        (true, false) => status.red().bold().to_string(),
    });
    lines.push(format!("Dataset similarity score: {:.3}", report.model_score));
    lines.push(String::new());

    lines.push("Issues:".to_string());
    if report.issues.is_empty() {
        lines.push("- No issues found.".to_string());
    } else {
        lines.extend(report.issues.iter().map(|i| format!("- {}", format_issue(i))));
    }

    if !report.similar_examples.is_empty() {
        lines.push(String::new());
        lines.push("Similar examples from the dataset:".to_string());
        for example in &report.similar_examples {
            lines.push(format!("- Score {:.3}", example.score));
            lines.push(example.code.clone());
            lines.push("-".repeat(RULE_WIDTH));
        }
    }

    lines.join("\n")
}

/// `Line 1, Col 9: missing_colon (confidence 0.95) - message | Fix: fix`
pub fn format_issue(issue: &Issue) -> String {
    let location = match (issue.line, issue.col) {
        (Some(line), Some(col)) => format!("Line {line}, Col {col}"),
        (Some(line), None) => format!("Line {line}"),
        (None, _) => "?".to_string(),
    };
    let mut text = format!(
        "{location}: {} (confidence {:.2}) - {}",
        issue.issue_type, issue.confidence, issue.message
    );
    if let Some(fix) = &issue.suggested_fix {
        text.push_str(" | Fix: ");
        text.push_str(fix);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_analyzer::{IssueType, SimilarExample};

    fn issue(line: Option<usize>, col: Option<usize>, fix: Option<&str>) -> Issue {
        Issue {
            issue_type: IssueType::MissingColon,
            line,
            col,
            message: "Missing ':'".into(),
            confidence: 0.95,
            suggested_fix: fix.map(str::to_string),
        }
    }

    #[test]
    fn formats_issue_locations() {
        assert_eq!(
            format_issue(&issue(Some(1), Some(9), Some("Add ':'"))),
            "Line 1, Col 9: missing_colon (confidence 0.95) - Missing ':' | Fix: Add ':'"
        );
        assert_eq!(
            format_issue(&issue(Some(3), None, None)),
            "Line 3: missing_colon (confidence 0.95) - Missing ':'"
        );
        assert!(format_issue(&issue(None, None, None)).starts_with("?: "));
    }

    #[test]
    fn clean_report() {
        let report = AnalysisReport {
            ok: true,
            issues: vec![],
            model_score: 0.81234,
            similar_examples: vec![SimilarExample {
                code: "x = 1".into(),
                score: 0.9,
            }],
        };
        let text = render_report(&report, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Status: OK");
        assert_eq!(lines[1], "Dataset similarity score: 0.812");
        assert!(lines.contains(&"- No issues found."));
        assert!(lines.contains(&"- Score 0.900"));
        assert_eq!(*lines.last().unwrap(), "-".repeat(40));
    }

    #[test]
    fn failing_report_without_examples() {
        let report = AnalysisReport {
            ok: false,
            issues: vec![issue(Some(1), Some(9), None)],
            model_score: 0.1,
            similar_examples: vec![],
        };
        let text = render_report(&report, false);
        assert!(text.starts_with("Status: ISSUES FOUND\n"));
        assert!(text.contains("- Line 1, Col 9: missing_colon"));
        assert!(!text.contains("Similar examples"));
    }
}
