// Response post-processing: fenced block extraction and emphasis stripping
// Author: kelexine (https://github.com/kelexine)

use crate::models::mapping::is_fence_tag;
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with optional info string, optional newline, lazily matched
/// body, closing fence.
static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?P<info>[^\n`]*)(?P<nl>\n?)(?P<body>.*?)```").expect("Invalid regex pattern")
});

/// One piece of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose outside any fence.
    Text(String),
    /// Interior of a fenced block, with its language tag if one was given.
    Code {
        language: Option<String>,
        body: String,
    },
}

/// A model response split into prose and fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    segments: Vec<Segment>,
}

impl ParsedResponse {
    /// Split `raw` into segments. An opening fence without a closing one is
    /// left as plain text.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in FENCE_REGEX.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > cursor {
                segments.push(Segment::Text(raw[cursor..whole.start()].to_string()));
            }

            let info = caps.name("info").map_or("", |m| m.as_str());
            let newline = caps.name("nl").map_or("", |m| m.as_str());
            let body = caps.name("body").map_or("", |m| m.as_str());
            segments.push(code_segment(info, newline, body));

            cursor = whole.end();
        }

        if cursor < raw.len() {
            segments.push(Segment::Text(raw[cursor..].to_string()));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Body of the first fenced block, untrimmed.
    pub fn first_code_block(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Code { body, .. } => Some(body.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn has_code(&self) -> bool {
        self.first_code_block().is_some()
    }
}

fn code_segment(info: &str, newline: &str, body: &str) -> Segment {
    // ```x``` on one line: everything between the fences is code, minus a
    // leading catalog tag such as ```python print(1)```
    if newline.is_empty() {
        let inline = format!("{}{}", info, body);
        if let Some((first, rest)) = inline.split_once(char::is_whitespace) {
            if is_fence_tag(first) && !rest.trim().is_empty() {
                return Segment::Code {
                    language: Some(first.to_string()),
                    body: rest.to_string(),
                };
            }
        }
        return Segment::Code {
            language: None,
            body: inline,
        };
    }

    let tag = info.trim();
    if tag.is_empty() {
        Segment::Code {
            language: None,
            body: body.to_string(),
        }
    } else if !tag.contains(char::is_whitespace) {
        Segment::Code {
            language: Some(tag.to_string()),
            body: body.to_string(),
        }
    } else {
        // Prose on the fence line is part of the block, not a tag
        Segment::Code {
            language: None,
            body: format!("{}\n{}", info, body),
        }
    }
}

/// Interior of the first fenced block, trimmed; the raw text verbatim when
/// the response has no complete fenced block.
pub fn extract_code(raw: &str) -> String {
    match ParsedResponse::parse(raw).first_code_block() {
        Some(body) => body.trim().to_string(),
        None => raw.to_string(),
    }
}

/// Drop every literal `*` (markdown emphasis) from an explanation.
pub fn strip_emphasis(raw: &str) -> String {
    raw.replace('*', "")
}
