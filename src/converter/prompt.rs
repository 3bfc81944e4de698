// Prompt templates sent to the model
// Author: kelexine (https://github.com/kelexine)

use crate::models::mapping::fence_tag;

/// Prompt asking for `code` translated from `source_language` to
/// `target_language`, with nothing but the code in the answer.
pub fn conversion_prompt(code: &str, source_language: &str, target_language: &str) -> String {
    format!(
        "Convert the following {source} code to {target}:\n\n\
         ```{tag}\n{code}\n```\n\n\
         Return ONLY the converted code without any explanation or additional text.",
        source = source_language,
        target = target_language,
        tag = fence_tag(source_language),
        code = code,
    )
}

/// Prompt asking for a learner-friendly explanation of `code`.
pub fn explanation_prompt(code: &str, language: &str) -> String {
    format!(
        "Explain the following {language} code in detail:\n\n\
         ```{tag}\n{code}\n```\n\n\
         Provide a clear explanation that focuses on:\n\
         1. What the code does\n\
         2. How it works step-by-step\n\
         3. Any key concepts or patterns used\n\n\
         Make the explanation accessible to someone learning this language.",
        language = language,
        tag = fence_tag(language),
        code = code,
    )
}
