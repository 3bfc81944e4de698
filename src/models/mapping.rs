// Language catalog and fence tag mapping
// Author: kelexine (https://github.com/kelexine)

use phf::phf_map;

/// Languages offered by the front ends, in display order.
pub const LANGUAGES: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "C++",
    "TypeScript",
    "PHP",
    "Go",
    "Ruby",
    "C#",
    "Swift",
];

pub const DEFAULT_INPUT_LANGUAGE: &str = "JavaScript";
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "Python";

/// Markdown fence tag for each catalog language
static FENCE_TAGS: phf::Map<&'static str, &'static str> = phf_map! {
    "JavaScript" => "javascript",
    "Python" => "python",
    "Java" => "java",
    "C++" => "cpp",
    "TypeScript" => "typescript",
    "PHP" => "php",
    "Go" => "go",
    "Ruby" => "ruby",
    "C#" => "csharp",
    "Swift" => "swift",
};

/// Whether `language` is one of the catalog entries (case-sensitive)
pub fn is_known_language(language: &str) -> bool {
    FENCE_TAGS.contains_key(language)
}

/// Whether `tag` names a catalog language, either by display name or by its
/// fence tag (case-insensitive).
pub fn is_fence_tag(tag: &str) -> bool {
    FENCE_TAGS
        .entries()
        .any(|(name, fence)| name.eq_ignore_ascii_case(tag) || fence.eq_ignore_ascii_case(tag))
}

/// Tag used to open a fenced block for `language` in a prompt.
///
/// Languages outside the catalog fall back to their lowercase name with
/// whitespace removed.
pub fn fence_tag(language: &str) -> String {
    match FENCE_TAGS.get(language) {
        Some(tag) => (*tag).to_string(),
        None => language
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect(),
    }
}
