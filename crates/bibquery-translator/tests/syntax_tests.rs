//! Integration tests for quoting and bracket handling.
//!
//! Quoted text is literal in Ovid: operator words and brackets inside quotes
//! must survive translation untouched.

use bibquery::{find_matching_bracket, parse_condition, ConditionTree};
use bibquery_translator::{LineTranslator, TargetDatabase};

fn output(line: &str, database: TargetDatabase) -> String {
    LineTranslator::new().translate_line(0, line, database).output
}

mod quoting {
    use super::*;

    #[test]
    fn test_quoted_and_is_one_term() {
        let tree = parse_condition("\"bacon and eggs\"").unwrap();
        assert!(matches!(tree, ConditionTree::Leaf(_)));
        assert_eq!(output("\"bacon and eggs\"", TargetDatabase::WoS), "\"bacon and eggs\"");
    }

    #[test]
    fn test_unquoted_and_is_binary() {
        let tree = parse_condition("bacon and eggs").unwrap();
        assert!(matches!(tree, ConditionTree::Binary { .. }));
        assert_eq!(tree.leaves().len(), 2);
    }

    #[test]
    fn test_quoted_bracket_is_literal() {
        let line = "\"mushrooms (fried\" or toast";
        let tree = parse_condition(line).unwrap();
        assert_eq!(tree.leaves().len(), 2);
        assert_eq!(output(line, TargetDatabase::Scopus), "\"mushrooms (fried\" or toast");
    }

    #[test]
    fn test_quoted_phrase_with_fields() {
        assert_eq!(
            output("\"bacon and eggs\".ti.", TargetDatabase::Proquest),
            "TITLE(\"bacon and eggs\")"
        );
    }

    #[test]
    fn test_dot_inside_quotes_is_not_a_suffix() {
        assert_eq!(
            output("\"vitamin b.ti\" or thiamine", TargetDatabase::WoS),
            "\"vitamin b.ti\" or thiamine"
        );
    }
}

mod brackets {
    use super::*;

    #[test]
    fn test_matching_bracket_balanced() {
        let cases = [
            ("()", 0, 1),
            ("(a (b) c)", 0, 8),
            ("(a (b) c)", 3, 5),
            ("x ((a) or (b)) y", 2, 13),
            ("(\"a)\" b)", 0, 7),
        ];
        for (text, open, close) in cases {
            assert_eq!(find_matching_bracket(text, open), Some(close), "{}", text);
        }
    }

    #[test]
    fn test_matching_bracket_unmatched() {
        for text in ["(", "(a (b)", "(\")\""] {
            assert_eq!(find_matching_bracket(text, 0), None, "{}", text);
        }
    }

    #[test]
    fn test_nested_groups_translate() {
        assert_eq!(
            output("((bacon or ham) and eggs) adj2 toast", TargetDatabase::Ebsco),
            "((bacon or ham) and eggs) N1 toast"
        );
    }

    #[test]
    fn test_missing_operator_after_group() {
        assert_eq!(
            output("(bacon or ham) eggs", TargetDatabase::WoS),
            "Could not parse: (bacon or ham) eggs"
        );
    }
}
