use crate::llm::planner::Batch;
use crate::llm::provider::ReviewProvider;
use crate::review::prompt::build_batch_prompt;
use crate::review::report::ReviewReport;
use crate::utils::progress::create_progress_bar;

/// Result of submitting all planned batches.
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Findings merged across all successful batches, in batch order
    pub report: ReviewReport,
    /// Number of batches whose submission failed and was skipped
    pub failed_batches: usize,
}

/// Submit each batch in order and merge the returned findings.
///
/// Batches are submitted sequentially. A batch whose submission fails is
/// logged and skipped; later batches still run. There is no retry.
pub async fn review_batches(
    provider: &dyn ReviewProvider,
    base_prompt: &str,
    batches: &[Batch],
) -> ReviewOutcome {
    let progress = create_progress_bar(batches.len() as u64);
    let mut report = ReviewReport::default();
    let mut failed_batches = 0;

    for (index, batch) in batches.iter().enumerate() {
        progress.set_message(format!(
            "reviewing batch {}/{} ({} files)",
            index + 1,
            batches.len(),
            batch.files.len()
        ));

        let prompt = build_batch_prompt(base_prompt, batch);
        match provider.review(&prompt).await {
            Ok(Some(findings)) => {
                tracing::debug!(
                    "Batch {} reported {} issues",
                    index + 1,
                    findings.issue_count()
                );
                report.merge(findings);
            }
            Ok(None) => {
                tracing::debug!("Batch {} reported no issues", index + 1);
            }
            Err(e) => {
                failed_batches += 1;
                tracing::error!("Failed to review batch {}: {}", index + 1, e);
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    ReviewOutcome {
        report,
        failed_batches,
    }
}
