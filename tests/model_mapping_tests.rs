// Language catalog tests
// Author: kelexine (https://github.com/kelexine)

use gemconvert::models::mapping::{
    fence_tag, is_known_language, DEFAULT_INPUT_LANGUAGE, DEFAULT_OUTPUT_LANGUAGE, LANGUAGES,
};

#[test]
fn test_catalog_contents() {
    assert_eq!(LANGUAGES.len(), 10);
    assert_eq!(LANGUAGES[0], "JavaScript");
    assert!(LANGUAGES.contains(&"Swift"));
    assert_eq!(DEFAULT_INPUT_LANGUAGE, "JavaScript");
    assert_eq!(DEFAULT_OUTPUT_LANGUAGE, "Python");
}

#[test]
fn test_symbolic_names_get_word_tags() {
    assert_eq!(fence_tag("C++"), "cpp");
    assert_eq!(fence_tag("C#"), "csharp");
}

#[test]
fn test_plain_names_are_lowercased() {
    assert_eq!(fence_tag("TypeScript"), "typescript");
    assert_eq!(fence_tag("PHP"), "php");
    assert_eq!(fence_tag("Kotlin"), "kotlin");
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert!(is_known_language("Python"));
    assert!(!is_known_language("python"));
    // Unknown names still get a usable tag
    assert_eq!(fence_tag("c++"), "c++");
}
