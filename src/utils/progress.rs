// Copyright (c) 2025-2026 the critiq contributors
// SPDX-License-Identifier: Apache-2.0

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar for tracking batch submission.
///
/// When stdout is not a TTY (e.g., piped output, CI environments), the bar
/// is created hidden so it produces no output.
///
/// # Arguments
///
/// * `len` - The total number of items to process.
#[must_use]
pub fn create_progress_bar(len: u64) -> ProgressBar {
    if !Term::stdout().is_term() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to parse progress bar template: {e}");
            ProgressStyle::default_bar()
        })
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar() {
        let pb = create_progress_bar(10);
        // Hidden bars report a length of None; visible ones report the given length.
        if !pb.is_hidden() {
            assert_eq!(pb.length(), Some(10));
        }
        pb.finish();
    }
}
