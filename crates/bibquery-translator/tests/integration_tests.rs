//! End-to-end translation tests.
//!
//! These run whole strategy lines through the public API for every target
//! database.

use bibquery_translator::{
    DiagnosticKind, LineTranslator, TargetDatabase, TranslationResult, WILDCARD_PLACEHOLDER,
};

fn translate(line: &str, database: TargetDatabase) -> TranslationResult {
    LineTranslator::new().translate_line(0, line, database)
}

// =============================================================================
// Proximity
// =============================================================================

mod proximity {
    use super::*;

    #[test]
    fn test_adj16_to_ebsco() {
        let result = translate("sleep adj16 quality", TargetDatabase::Ebsco);
        assert_eq!(result.output, "sleep N15 quality");
    }

    #[test]
    fn test_distance_is_words_between() {
        let cases = [
            (TargetDatabase::WoS, "heart NEAR/2 attack"),
            (TargetDatabase::Cochrane, "heart NEAR/2 attack"),
            (TargetDatabase::Scopus, "heart W/2 attack"),
            (TargetDatabase::Proquest, "heart NEAR/2 attack"),
            (TargetDatabase::Ebsco, "heart N2 attack"),
        ];
        for (db, expected) in cases {
            assert_eq!(translate("heart adj3 attack", db).output, expected, "{}", db);
        }
    }

    #[test]
    fn test_adj1_is_zero_words_between() {
        let result = translate("heart adj1 attack", TargetDatabase::Scopus);
        assert_eq!(result.output, "heart W/0 attack");
    }

    #[test]
    fn test_wildcards_with_proximity_in_ebsco() {
        let result = translate("air condi?ioning* adj4 mushrooms", TargetDatabase::Ebsco);
        assert_eq!(result.output, "\"air condi#ioning*\" N3 mushrooms");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_uppercase_operator() {
        let result = translate("heart ADJ3 attack", TargetDatabase::WoS);
        assert_eq!(result.output, "heart NEAR/2 attack");
    }

    #[test]
    fn test_bare_adj_is_parse_failure() {
        let result = translate("heart adj attack", TargetDatabase::WoS);
        assert_eq!(result.output, "Could not parse: heart adj attack");
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::ParseFailure);
    }

    #[test]
    fn test_adj0_is_parse_failure() {
        let result = translate("heart adj0 attack", TargetDatabase::Scopus);
        assert!(result.is_failure());
    }
}

// =============================================================================
// Field-qualified conditions
// =============================================================================

mod fields {
    use super::*;

    #[test]
    fn test_bacon_and_eggs_to_wos() {
        let result = translate("bacon and eggs.tw,ti", TargetDatabase::WoS);
        assert_eq!(result.output, "TS=(bacon and eggs) OR TI=(bacon and eggs)");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_bacon_and_eggs_to_ebsco() {
        let result = translate("bacon and eggs.tw,ti", TargetDatabase::Ebsco);
        assert_eq!(result.output, "TI bacon and eggs");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnmappedField);
        assert_eq!(
            result.diagnostics_text(),
            "Was not able to find an equivalent for tw for EBSCO"
        );
    }

    #[test]
    fn test_one_diagnostic_per_dropped_field() {
        let result = translate("sleep.tw,ab,ti.", TargetDatabase::WoS);
        assert_eq!(result.output, "TS=(sleep) OR TI=(sleep)");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics_text().contains("ab"));
    }

    #[test]
    fn test_every_database_title_abstract() {
        let cases = [
            (TargetDatabase::WoS, "TI=(sleep)"),
            (TargetDatabase::Cochrane, "sleep:ti,ab"),
            (TargetDatabase::Scopus, "TITLE-ABS(sleep)"),
            (TargetDatabase::Proquest, "TITLE,ABSTRACT(sleep)"),
            (TargetDatabase::PubMed, "sleep[ti] OR sleep[ab]"),
            (TargetDatabase::Ebsco, "TI,AB sleep"),
        ];
        for (db, expected) in cases {
            assert_eq!(translate("sleep.ti,ab.", db).output, expected, "{}", db);
        }
    }

    #[test]
    fn test_keyword_fields() {
        let result = translate("insomnia.kf,kw.", TargetDatabase::Scopus);
        assert_eq!(result.output, "KEY-KEY(insomnia)");
    }

    #[test]
    fn test_dotted_field_code() {
        let result = translate("sleep.m_titl.", TargetDatabase::Scopus);
        assert_eq!(result.output, "sleep");
        assert_eq!(result.diagnostics.len(), 1);

        let result = translate("sleep.m.titl.", TargetDatabase::Scopus);
        assert_eq!(result.output, "TITLE(sleep)");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_dotted_search_text_keeps_its_dots() {
        assert_eq!(translate("e.coli.ti.", TargetDatabase::WoS).output, "TI=(e.coli)");
        assert_eq!(
            translate("vitamin b.12.tw.", TargetDatabase::Scopus).output,
            "TITLE-ABS(\"vitamin b.12\")"
        );
        assert_eq!(
            translate("e.coli.ti,ab.", TargetDatabase::Cochrane).output,
            "e.coli:ti,ab"
        );
    }

    #[test]
    fn test_bracketed_condition_with_fields() {
        let result = translate("(bacon or sausages) adj3 mushrooms.tw.", TargetDatabase::Cochrane);
        assert_eq!(result.output, "(bacon or sausages) NEAR/2 mushrooms:ti,ab");
    }
}

// =============================================================================
// Wildcards
// =============================================================================

mod wildcards {
    use super::*;

    #[test]
    fn test_pubmed_wildcard_placeholder() {
        let result = translate("colo?r.ti.", TargetDatabase::PubMed);
        assert_eq!(result.output, format!("{}[ti]", WILDCARD_PLACEHOLDER));
        assert_eq!(
            result.diagnostics_text(),
            "Wildcards could not be mapped as unsupported in PubMed for string colo?r"
        );
    }

    #[test]
    fn test_cochrane_mandatory_downgrade() {
        let result = translate("wom#n.ti.", TargetDatabase::Cochrane);
        assert_eq!(result.output, "wom?n:ti");
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::WildcardDowngraded);
    }

    #[test]
    fn test_wos_wildcards() {
        let result = translate("wom#n or colo?r", TargetDatabase::WoS);
        assert_eq!(result.output, "wom?n or colo$r");
        assert!(result.diagnostics.is_empty());
    }
}

// =============================================================================
// PubMed proximity hoisting
// =============================================================================

mod pubmed {
    use super::*;

    #[test]
    fn test_proximity_moves_to_field_tag() {
        let result = translate("(sleep adj3 quality).ti,ab.", TargetDatabase::PubMed);
        assert_eq!(
            result.output,
            "(sleep quality)[ti:~2] OR (sleep quality)[ab:~2]"
        );
    }

    #[test]
    fn test_truncation_with_proximity_warns() {
        let result = translate("sleep* adj3 quality.tw.", TargetDatabase::PubMed);
        assert_eq!(result.output, "sleep* quality[tiab:~2]");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::ProximityWildcard);
    }

    #[test]
    fn test_subject_headings() {
        assert_eq!(translate("exp Sleep/", TargetDatabase::PubMed).output, "Sleep[MeSH]");
        assert_eq!(
            translate("*Sleep Wake Disorders/", TargetDatabase::PubMed).output,
            "Sleep Wake Disorders[Majr:noexp]"
        );
    }
}

// =============================================================================
// Subject headings elsewhere
// =============================================================================

mod subject_headings {
    use super::*;

    #[test]
    fn test_unmapped_everywhere_but_pubmed() {
        for db in TargetDatabase::ALL {
            if db == TargetDatabase::PubMed {
                continue;
            }
            let result = translate("5. exp *Sleep/ (1204)", db);
            assert_eq!(result.output, "Unmapped subject heading exp *Sleep/");
            assert_eq!(result.diagnostics.len(), 1, "{}", db);
            assert_eq!(
                result.diagnostics[0].kind,
                DiagnosticKind::SubjectHeadingUnsupported
            );
        }
    }

    #[test]
    fn test_subheading_is_a_heading_not_text() {
        let result = translate("4. Sleep/th (310)", TargetDatabase::PubMed);
        assert_eq!(result.output, "Sleep[MeSH:noexp]");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::SubheadingDropped);

        let result = translate("Sleep/th", TargetDatabase::Scopus);
        assert_eq!(result.output, "Unmapped subject heading Sleep/th");
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::SubjectHeadingUnsupported);
    }
}

// =============================================================================
// Query references
// =============================================================================

mod references {
    use super::*;

    #[test]
    fn test_or_range_expands_to_sixteen() {
        let result = translate("or/5-20", TargetDatabase::WoS);
        let parts: Vec<&str> = result.output.split(" or ").collect();
        assert_eq!(parts.len(), 16);
        assert_eq!(parts.first(), Some(&"#5"));
        assert_eq!(parts.last(), Some(&"#20"));
        let expected: Vec<String> = (5..=20).map(|n| format!("#{}", n)).collect();
        assert_eq!(parts, expected);
    }

    #[test]
    fn test_reference_templates() {
        assert_eq!(translate("and/1-3", TargetDatabase::Proquest).output, "1 and 2 and 3");
        assert_eq!(translate("and/1-3", TargetDatabase::Ebsco).output, "S1 and S2 and S3");
        assert_eq!(translate("and/1-3", TargetDatabase::PubMed).output, "#1 and #2 and #3");
    }

    #[test]
    fn test_range_list() {
        let result = translate("or/1,3,5-6", TargetDatabase::Scopus);
        assert_eq!(result.output, "#1 or #3 or #5 or #6");
    }

    #[test]
    fn test_descending_range_fails() {
        let result = translate("or/9-2", TargetDatabase::Scopus);
        assert_eq!(result.output, "Could not parse: or/9-2");
    }

    #[test]
    fn test_oversized_range_fails() {
        let result = translate("or/1-4000000000", TargetDatabase::WoS);
        assert_eq!(result.output, "Could not parse: or/1-4000000000");
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::ParseFailure);
    }

    #[test]
    fn test_oversized_line_number_fails() {
        let result = translate("99999999999 and 1", TargetDatabase::Ebsco);
        assert_eq!(result.output, "Could not parse: 99999999999 and 1");
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::ParseFailure);
    }

    #[test]
    fn test_bracketed_combination() {
        let result = translate("12. (1 or 2) and 3", TargetDatabase::Ebsco);
        assert_eq!(result.output, "(S1 or S2) and S3");
    }
}

// =============================================================================
// Whole strategies
// =============================================================================

mod strategies {
    use super::*;

    const STRATEGY: &str = "\
1. exp Sleep/ (84210)
2. (sleep* adj3 (quality or hygiene)).tw,kf. (5012)
3. \"sleep hygiene\".ti,ab. (977)
4. or/1-3 (88001)
5. (insomnia (
6. 4 and
";

    #[test]
    fn test_one_result_per_line_in_order() {
        let report = LineTranslator::new().translate_text(STRATEGY, TargetDatabase::Scopus);
        assert_eq!(report.len(), 6);
        assert_eq!(report.database, TargetDatabase::Scopus);

        let outputs: Vec<&str> = report.iter().map(|r| r.output.as_str()).collect();
        assert_eq!(outputs[0], "Unmapped subject heading exp Sleep/");
        assert_eq!(
            outputs[1],
            "TITLE-ABS-KEY((sleep* W/2 (quality or hygiene)))"
        );
        assert_eq!(outputs[2], "TITLE-ABS(\"sleep hygiene\")");
        assert_eq!(outputs[3], "#1 or #2 or #3");
        assert_eq!(outputs[4], "Could not parse: 5. (insomnia (");
        assert!(outputs[5].starts_with("Could not"));
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_warnings_are_per_line() {
        let report = LineTranslator::new().translate_text(STRATEGY, TargetDatabase::WoS);
        let warnings = report.render_warnings();
        let lines: Vec<&str> = warnings.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Was not able to map subject heading"));
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "Was not able to find an equivalent for ab for WoS"
        );
        assert_eq!(lines[3], "");
        assert!(lines[4].starts_with("Error: could not parse:"));
    }
}
