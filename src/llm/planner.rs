// Copyright (c) 2025-2026 the critiq contributors
// SPDX-License-Identifier: Apache-2.0

//! Token-budgeted batch planning for review submission.
//!
//! This module partitions the scanned file sequence into ordered batches
//! whose estimated token cost stays near a budget, so each batch can be
//! submitted as a single model prompt. Packing is greedy, single-pass, and
//! order-preserving: no reordering or re-optimization across batches, which
//! keeps planning deterministic and streamable at the cost of packing
//! density.
//!
//! # Example
//!
//! ```
//! use critiq::llm::planner::plan_batches;
//! use critiq::scanner::FileEntry;
//!
//! let files = vec![FileEntry {
//!     path: "src/main.rs".to_string(),
//!     content: "fn main() {}".to_string(),
//! }];
//! let batches = plan_batches(files, 10, 100, |f| f.content.len()).unwrap();
//! assert_eq!(batches.len(), 1);
//! ```

use crate::scanner::FileEntry;
use crate::utils::error::CritiqError;

/// Fraction of a model's context window available to the prompt, leaving
/// headroom for the model's response.
pub const PROMPT_BUDGET_RATIO: f64 = 0.7;

/// Compute the prompt token budget for a model's context window.
#[must_use]
pub fn prompt_budget(context_window: usize) -> usize {
    (context_window as f64 * PROMPT_BUDGET_RATIO) as usize
}

/// An ordered group of files intended for one model submission.
///
/// `token_count` is the realized estimate for the batch: the fixed
/// per-batch overhead plus the sum of per-file costs. It exceeds the
/// nominal budget only for a single-file batch whose file alone does not
/// fit.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Files in this batch, in scan order
    pub files: Vec<FileEntry>,
    /// Estimated token total: overhead + per-file costs
    pub token_count: usize,
}

impl Batch {
    /// Whether this batch exceeds the nominal budget (only possible for a
    /// single oversized file).
    #[must_use]
    pub fn is_over_budget(&self, budget: usize) -> bool {
        self.token_count > budget
    }
}

/// Partition files into ordered, token-budgeted batches.
///
/// Each batch starts at `overhead` tokens (the fixed prompt preamble
/// repeated in every submission). A file is appended to the current batch
/// unless doing so would push it past `budget` while the batch already
/// holds files; then the batch is closed and a new one started. Files are
/// never dropped, split, or reordered, so a file whose cost plus overhead
/// exceeds the budget ends up alone in a batch that overflows the budget.
///
/// Planning is deterministic given the same file sequence, overhead,
/// budget, and estimator.
///
/// # Errors
///
/// Returns a validation error if `budget` is zero.
pub fn plan_batches<F>(
    files: Vec<FileEntry>,
    overhead: usize,
    budget: usize,
    mut estimate_file: F,
) -> Result<Vec<Batch>, CritiqError>
where
    F: FnMut(&FileEntry) -> usize,
{
    if budget == 0 {
        return Err(CritiqError::invalid_budget());
    }

    let mut batches = Vec::new();
    let mut current = Vec::new();
    let mut current_tokens = overhead;

    for file in files {
        let file_tokens = estimate_file(&file);

        if current_tokens + file_tokens > budget && !current.is_empty() {
            batches.push(Batch {
                files: std::mem::take(&mut current),
                token_count: current_tokens,
            });
            current_tokens = overhead;
        }

        current.push(file);
        current_tokens += file_tokens;
    }

    if !current.is_empty() {
        batches.push(Batch {
            files: current,
            token_count: current_tokens,
        });
    }

    Ok(batches)
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

    /// Files whose estimated cost equals their content length, which makes
    /// the arithmetic in the tests exact.
    fn sized_files(costs: &[usize]) -> Vec<FileEntry> {
        costs
            .iter()
            .enumerate()
            .map(|(i, cost)| entry(&format!("file{}.txt", i + 1), &"x".repeat(*cost)))
            .collect()
    }

    fn by_len(f: &FileEntry) -> usize {
        f.content.len()
    }

    #[test]
    fn test_greedy_partition_with_overflow() {
        // overhead 10, budget 100, costs [40, 40, 40, 200, 5]
        let files = sized_files(&[40, 40, 40, 200, 5]);
        let batches = plan_batches(files, 10, 100, by_len).unwrap();

        assert_eq!(batches.len(), 4);

        assert_eq!(batches[0].token_count, 90);
        assert_eq!(batches[0].files.len(), 2);

        assert_eq!(batches[1].token_count, 50);
        assert_eq!(batches[1].files.len(), 1);
        assert_eq!(batches[1].files[0].path, "file3.txt");

        // The 200-token file sits alone and overflows the budget.
        assert_eq!(batches[2].token_count, 210);
        assert_eq!(batches[2].files.len(), 1);
        assert!(batches[2].is_over_budget(100));

        assert_eq!(batches[3].token_count, 15);
        assert_eq!(batches[3].files.len(), 1);
    }

    #[test]
    fn test_every_file_in_exactly_one_batch_in_order() {
        let files = sized_files(&[30, 70, 10, 90, 5, 5, 200, 1]);
        let expected: Vec<String> = files.iter().map(|f| f.path.clone()).collect();

        let batches = plan_batches(files, 10, 100, by_len).unwrap();

        let flattened: Vec<String> = batches
            .iter()
            .flat_map(|b| b.files.iter().map(|f| f.path.clone()))
            .collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_budget_respected_except_oversized_singleton() {
        let files = sized_files(&[50, 50, 300, 20, 20, 20]);
        let batches = plan_batches(files, 10, 100, by_len).unwrap();

        for batch in &batches {
            if batch.is_over_budget(100) {
                assert_eq!(
                    batch.files.len(),
                    1,
                    "only a single oversized file may overflow"
                );
            }
        }
    }

    #[test]
    fn test_oversized_file_is_never_dropped() {
        let files = sized_files(&[500]);
        let batches = plan_batches(files, 10, 100, by_len).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].files.len(), 1);
        assert_eq!(batches[0].token_count, 510);
    }

    #[test]
    fn test_empty_input_yields_zero_batches() {
        let batches = plan_batches(Vec::new(), 10, 100, by_len).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_exact_fit_stays_in_one_batch() {
        // 10 + 45 + 45 == 100: not over budget, nothing closes early.
        let files = sized_files(&[45, 45]);
        let batches = plan_batches(files, 10, 100, by_len).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].token_count, 100);
    }

    #[test]
    fn test_planning_is_deterministic() {
        let files = sized_files(&[33, 12, 99, 4, 150, 7]);
        let a = plan_batches(files.clone(), 10, 100, by_len).unwrap();
        let b = plan_batches(files, 10, 100, by_len).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.token_count, y.token_count);
            assert_eq!(x.files, y.files);
        }
    }

    #[test]
    fn test_zero_budget_fails_fast() {
        let result = plan_batches(sized_files(&[10]), 10, 0, by_len);
        assert!(result.is_err());
    }

    #[test]
    fn test_overhead_at_or_above_budget_packs_one_file_per_batch() {
        let files = sized_files(&[1, 1, 1]);
        let batches = plan_batches(files, 100, 100, by_len).unwrap();

        assert_eq!(batches.len(), 3);
        for batch in &batches {
            assert_eq!(batch.files.len(), 1);
            assert!(batch.is_over_budget(100));
        }
    }

    #[test]
    fn test_prompt_budget_ratio() {
        assert_eq!(prompt_budget(128_000), 89_600);
        assert_eq!(prompt_budget(200_000), 140_000);
        assert_eq!(prompt_budget(0), 0);
    }
}
