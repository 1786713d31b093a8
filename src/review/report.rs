use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the function/tool the model calls to report findings.
pub const FINDINGS_TOOL_NAME: &str = "report_review_issues";

/// Findings for a single file: the path plus free-text issue descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFindings {
    pub file_path: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Structured review findings returned by the model's tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    #[serde(default)]
    pub files: Vec<FileFindings>,
}

impl ReviewReport {
    /// Whether the report carries any issues at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.iter().all(|f| f.issues.is_empty())
    }

    /// Total number of issues across all files.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    /// Fold another report's findings into this one, preserving order.
    pub fn merge(&mut self, other: ReviewReport) {
        self.files.extend(other.files);
    }
}

/// JSON schema for the findings tool, shared by all providers.
///
/// OpenAI embeds this as a function's `parameters`; Anthropic as a tool's
/// `input_schema`.
#[must_use]
pub fn findings_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "files": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "file_path": {
                            "type": "string",
                            "description": "Path of the file the issues were found in."
                        },
                        "issues": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "One entry per issue, in the form `line number: offending code` followed by what is wrong."
                        }
                    },
                    "required": ["file_path", "issues"]
                }
            }
        },
        "required": ["files"]
    })
}

/// Render a merged report for the terminal.
#[must_use]
pub fn render(report: &ReviewReport) -> String {
    if report.is_empty() {
        return format!("{}\n", console::style("No issues found.").green());
    }

    let mut out = String::new();
    for findings in &report.files {
        if findings.issues.is_empty() {
            continue;
        }
        out.push_str("----\n");
        out.push_str(&format!(
            "{}\n",
            console::style(&findings.file_path).bold()
        ));
        for issue in &findings.issues {
            out.push_str(&format!("- {}\n", issue));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deserializes_from_tool_arguments() {
        let arguments = r#"{
            "files": [
                {"file_path": "src/main.rs", "issues": ["12: unwrap() on user input"]}
            ]
        }"#;
        let report: ReviewReport = serde_json::from_str(arguments).expect("valid arguments");
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].file_path, "src/main.rs");
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn test_missing_files_field_is_empty_report() {
        let report: ReviewReport = serde_json::from_str("{}").expect("valid arguments");
        assert!(report.is_empty());
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut merged = ReviewReport {
            files: vec![FileFindings {
                file_path: "a.rs".to_string(),
                issues: vec!["first".to_string()],
            }],
        };
        merged.merge(ReviewReport {
            files: vec![FileFindings {
                file_path: "b.rs".to_string(),
                issues: vec!["second".to_string()],
            }],
        });

        assert_eq!(merged.files[0].file_path, "a.rs");
        assert_eq!(merged.files[1].file_path, "b.rs");
        assert_eq!(merged.issue_count(), 2);
    }

    #[test]
    fn test_schema_names_required_fields() {
        let schema = findings_schema();
        assert_eq!(schema["properties"]["files"]["type"], "array");
        let required = schema["properties"]["files"]["items"]["required"]
            .as_array()
            .expect("required array");
        assert!(required.iter().any(|v| v == "file_path"));
        assert!(required.iter().any(|v| v == "issues"));
    }

    #[test]
    fn test_render_empty_report() {
        let rendered = render(&ReviewReport::default());
        assert!(rendered.contains("No issues found"));
    }

    #[test]
    fn test_render_lists_issues_per_file() {
        let report = ReviewReport {
            files: vec![FileFindings {
                file_path: "src/lib.rs".to_string(),
                issues: vec!["3: missing error context".to_string()],
            }],
        };
        let rendered = render(&report);
        assert!(rendered.contains("src/lib.rs"));
        assert!(rendered.contains("- 3: missing error context"));
    }
}
