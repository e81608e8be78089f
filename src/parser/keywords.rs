//! Reserved words of the dflow language.

use super::SyntaxKind;

/// Every reserved word, in the order the lexer declares them
pub const KEYWORDS: &[&str] = &["task", "step", "depends", "on", "true", "false"];

/// Look up the keyword kind for a word, if it is reserved
pub fn keyword_kind(word: &str) -> Option<SyntaxKind> {
    Some(match word {
        "task" => SyntaxKind::TASK_KW,
        "step" => SyntaxKind::STEP_KW,
        "depends" => SyntaxKind::DEPENDS_KW,
        "on" => SyntaxKind::ON_KW,
        "true" => SyntaxKind::TRUE_KW,
        "false" => SyntaxKind::FALSE_KW,
        _ => return None,
    })
}

/// Check if a word is reserved and cannot name a vertex or parameter
pub fn is_keyword(word: &str) -> bool {
    keyword_kind(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_has_a_kind() {
        for word in KEYWORDS {
            let kind = keyword_kind(word).expect("keyword kind");
            assert!(kind.is_keyword());
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(is_keyword("task"));
        assert!(!is_keyword("Task"));
        assert!(!is_keyword("fetch"));
    }
}
