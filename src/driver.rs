use indicatif::ProgressBar;

use crate::{
    aggregate::annotate_with_retries,
    client::Annotator,
    prompt::{build_prompt, PromptMode},
    table::{AnnotatedRecord, ArgumentRecord},
};

#[derive(Clone, Copy, Debug)]
pub struct AnnotationConfig {
    /// Independent calls per argument
    pub runs: usize,
    pub mode: PromptMode,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            runs: 3,
            mode: PromptMode::Unbiased,
        }
    }
}

/// Annotate every argument in order, one at a time.
///
/// Nothing is checkpointed: the caller persists the returned records.
pub async fn annotate_table<A>(
    annotator: &A,
    rows: &[ArgumentRecord],
    config: &AnnotationConfig,
    bar: &ProgressBar,
) -> Vec<AnnotatedRecord>
where
    A: Annotator + ?Sized,
{
    let total = rows.len();
    let mut out = Vec::with_capacity(total);
    for (i, arg) in rows.iter().enumerate() {
        let prompt = build_prompt(&arg.claim_text, &arg.premise_texts, config.mode);
        let runs =
            annotate_with_retries(annotator, &prompt, config.runs, config.mode.is_biased()).await;
        out.push(AnnotatedRecord {
            argument: arg.clone(),
            runs,
        });
        log::info!("Annotated argument {}/{total} ({})", i + 1, arg.arg_id);
        bar.inc(1);
    }
    out
}
