//! Prompt construction for narrative insights

use crate::analysis::document::truncate_chars;

/// Default cap on document characters included in the prompt
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 15_000;

/// System message sent with every request
pub const SYSTEM_PROMPT: &str = "You are an expert compliance auditor.";

/// Build the user message for `text` and the selected frameworks
///
/// Only the first `max_chars` characters of `text` are included.
pub fn user_prompt<S: AsRef<str>>(text: &str, frameworks: &[S], max_chars: usize) -> String {
    let frameworks = frameworks
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    let excerpt = truncate_chars(text, max_chars);

    format!(
        "Analyze the following text for compliance violations against these frameworks: {frameworks}.\n\
         \n\
         Text content:\n\
         {excerpt}\n\
         \n\
         Provide a concise summary of:\n\
         1. Key Compliance Risks\n\
         2. Missing Disclosures\n\
         3. Recommendations\n"
    )
}
