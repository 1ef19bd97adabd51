use std::fmt;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

/// A parsed key path such as `a.b[2].c[-1]`.
///
/// Whether a numeric step addresses a map key or a sequence slot is decided by
/// the navigator at traversal time, from the type of the node it lands on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub steps: Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),  // .foo
    Index(usize), // .2 or [2]
    Append,       // [-1]: end of sequence
}

impl PathStep {
    /// The step as a map key. Numeric steps look up their decimal text.
    pub fn as_key(&self) -> String {
        match self {
            PathStep::Key(k) => k.clone(),
            PathStep::Index(i) => i.to_string(),
            PathStep::Append => "-1".to_string(),
        }
    }

    fn classify(token: &str) -> Self {
        if token == "-1" {
            return PathStep::Append;
        }
        // Only canonical decimals are indexes so keys like "007" survive intact.
        let canonical = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && (token == "0" || !token.starts_with('0'));
        match token.parse::<usize>() {
            Ok(i) if canonical => PathStep::Index(i),
            _ => PathStep::Key(token.to_string()),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => write!(f, "{k}"),
            PathStep::Index(i) => write!(f, "{i}"),
            PathStep::Append => write!(f, "-1"),
        }
    }
}

impl Path {
    pub fn parse(input: &str) -> Self {
        parse_path(input)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Splits off the final step, leaving the steps that lead to its container.
    pub fn split_last(&self) -> Option<(&PathStep, &[PathStep])> {
        self.steps.split_last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps.iter().join("."))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        parse_path(s)
    }
}

fn bracket_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(-?\d+)\]").expect("bracket pattern compiles"))
}

/// Rewrites every `[N]` accessor into its `.N` form.
pub fn brackets_to_dots(input: &str) -> String {
    bracket_regex().replace_all(input, ".$1").into_owned()
}

/// Parse a key path. The empty string is the document root.
pub fn parse_path(input: &str) -> Path {
    if input.is_empty() {
        return Path::default();
    }
    let steps = brackets_to_dots(input)
        .split('.')
        .map(PathStep::classify)
        .collect();
    Path { steps }
}
