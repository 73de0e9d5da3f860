//! Rendering of permutation tuples into passphrase candidates

use std::fmt;

/// Turns a tuple of vocabulary tokens into the literal string given to the oracle.
///
/// Implementations must be pure and injective over the candidate space.
pub trait CandidateRenderer: Send + Sync {
    fn render(&self, tokens: &[&str]) -> String;
}

/// Built-in passphrase conventions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderRule {
    /// Tokens joined with single spaces
    Plain,
    /// Upper-case the first letter of the first token
    #[default]
    CapitalizeFirst,
    /// Upper-case the first letter of the first token and the last letter of the last token
    CapitalizeEnds,
    /// Upper-case the first letter of the token at `index`, then prepend `prefix`
    CapitalizeAt {
        index: usize,
        prefix: Option<String>,
    },
}

impl CandidateRenderer for RenderRule {
    fn render(&self, tokens: &[&str]) -> String {
        let mut words: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        match self {
            RenderRule::Plain => {}
            RenderRule::CapitalizeFirst => {
                if let Some(first) = words.first_mut() {
                    *first = upper_first(first);
                }
            }
            RenderRule::CapitalizeEnds => {
                if let Some(first) = words.first_mut() {
                    *first = upper_first(first);
                }
                if let Some(last) = words.last_mut() {
                    *last = upper_last(last);
                }
            }
            RenderRule::CapitalizeAt { index, .. } => {
                if let Some(word) = words.get_mut(*index) {
                    *word = upper_first(word);
                }
            }
        }

        let body = words.join(" ");
        match self {
            RenderRule::CapitalizeAt {
                prefix: Some(prefix),
                ..
            } => format!("{} {}", prefix, body),
            _ => body,
        }
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_last(word: &str) -> String {
    match word.char_indices().next_back() {
        Some((i, c)) => {
            let mut out = word[..i].to_string();
            out.extend(c.to_uppercase());
            out
        }
        None => String::new(),
    }
}

impl fmt::Display for RenderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderRule::Plain => write!(f, "plain"),
            RenderRule::CapitalizeFirst => write!(f, "capitalize-first"),
            RenderRule::CapitalizeEnds => write!(f, "capitalize-ends"),
            RenderRule::CapitalizeAt { index, prefix } => {
                write!(f, "capitalize-at({})", index)?;
                if let Some(prefix) = prefix {
                    write!(f, " with prefix '{}'", prefix)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() {
        assert_eq!(RenderRule::Plain.render(&["tree", "lemon"]), "tree lemon");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(
            RenderRule::CapitalizeFirst.render(&["skye", "lemon", "tree", "green"]),
            "Skye lemon tree green"
        );
    }

    #[test]
    fn test_capitalize_ends() {
        assert_eq!(
            RenderRule::CapitalizeEnds.render(&["tree", "lemon", "green", "blue"]),
            "Tree lemon green bluE"
        );
        assert_eq!(RenderRule::CapitalizeEnds.render(&["red"]), "ReD");
    }

    #[test]
    fn test_capitalize_at_with_prefix() {
        let rule = RenderRule::CapitalizeAt {
            index: 2,
            prefix: Some("Tree".to_string()),
        };
        assert_eq!(
            rule.render(&["skye", "lemon", "tree", "green"]),
            "Tree skye lemon Tree green"
        );

        // Out of range index leaves tokens alone
        let rule = RenderRule::CapitalizeAt {
            index: 9,
            prefix: None,
        };
        assert_eq!(rule.render(&["a", "b"]), "a b");
    }

    #[test]
    fn test_display() {
        let rule = RenderRule::CapitalizeAt {
            index: 2,
            prefix: Some("Tree".to_string()),
        };
        assert_eq!(rule.to_string(), "capitalize-at(2) with prefix 'Tree'");
        assert_eq!(RenderRule::CapitalizeFirst.to_string(), "capitalize-first");
    }

    #[test]
    fn test_non_ascii_and_empty() {
        assert_eq!(RenderRule::CapitalizeFirst.render(&["über", "alles"]), "Über alles");
        assert_eq!(RenderRule::CapitalizeEnds.render(&[""]), "");
    }
}
