// Copyright (c) 2025-2026 the critiq contributors
// SPDX-License-Identifier: Apache-2.0

//! Prompt assembly for review submission.
//!
//! The base prompt (instructions, numbered criteria, optional extra
//! context) is the fixed overhead repeated in every batch; each file is
//! appended as a path-plus-code block. The planner prices batches by token
//! counts of exactly these strings, so budget accounting matches what is
//! actually sent.

use crate::llm::planner::Batch;
use crate::scanner::FileEntry;

/// Build the instruction preamble shared by every batch.
pub fn build_base_prompt(criteria: &[String], context: Option<&str>) -> String {
    let mut prompt = String::from(
        "Review the following code strictly against the listed criteria and \
         report every finding through the report_review_issues tool. \
         If there are no concerns, do not report anything.\n",
    );

    prompt.push_str("\nReview criteria:\n");
    for (index, criterion) in criteria.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, criterion));
    }

    if let Some(context) = context {
        prompt.push_str("\nAdditional context to consider during review:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt
}

/// Format one file as it appears in a batch prompt.
///
/// The token cost of this exact string is what the planner charges for the
/// file.
pub fn file_block(file: &FileEntry) -> String {
    format!("\n\nFile path: {}\n\nCode:\n{}", file.path, file.content)
}

/// Assemble the full prompt for one batch: base prompt plus file blocks in
/// batch order.
pub fn build_batch_prompt(base_prompt: &str, batch: &Batch) -> String {
    let mut prompt = base_prompt.to_string();
    for file in &batch.files {
        prompt.push_str(&file_block(file));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_base_prompt_numbers_criteria() {
        let criteria = vec![
            "error handling".to_string(),
            "unsafe concurrency".to_string(),
        ];
        let prompt = build_base_prompt(&criteria, None);
        assert!(prompt.contains("1. error handling"));
        assert!(prompt.contains("2. unsafe concurrency"));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_base_prompt_includes_context_when_given() {
        let criteria = vec!["style".to_string()];
        let prompt = build_base_prompt(&criteria, Some("This service is latency sensitive."));
        assert!(prompt.contains("Additional context"));
        assert!(prompt.contains("latency sensitive"));
    }

    #[test]
    fn test_file_block_format() {
        let block = file_block(&entry("src/main.rs", "fn main() {}"));
        assert!(block.starts_with("\n\nFile path: src/main.rs"));
        assert!(block.ends_with("Code:\nfn main() {}"));
    }

    #[test]
    fn test_batch_prompt_appends_files_in_order() {
        let batch = Batch {
            files: vec![entry("a.rs", "a"), entry("b.rs", "b")],
            token_count: 0,
        };
        let prompt = build_batch_prompt("BASE", &batch);
        let a = prompt.find("File path: a.rs").expect("a.rs present");
        let b = prompt.find("File path: b.rs").expect("b.rs present");
        assert!(prompt.starts_with("BASE"));
        assert!(a < b);
    }
}
