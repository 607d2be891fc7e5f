use std::collections::HashMap;

use flix_core::chars;
use flix_core::lang::keywords;
use flix_core::lang::precedence::{self, PrecedenceId};
use flix_core::lang::punctuation::{self, PunctuationCategory};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical, "keyword as_str mismatch for {:?}", info.id);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }

        for &alias in info.aliases {
            assert_eq!(keywords::from_str(alias), Some(info.id), "keyword alias not resolvable: {}", alias);
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!("duplicate keyword alias spelling {:?}: {:?} and {:?}", alias, prev, info.id);
            }
        }
    }
}

#[test]
fn keywords_are_alpha_identifiers() {
    // Keyword lookup happens after an alpha identifier is scanned, so every spelling must be one.
    for info in keywords::KEYWORDS {
        let mut it = info.canonical.chars();
        let first = it.next().unwrap();
        assert!(chars::is_ident_start(first), "{}", info.canonical);
        assert!(it.all(chars::is_ident_continue), "{}", info.canonical);
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();

    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert_eq!(punctuation::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn reserved_symbols_are_operator_runs() {
    // The lexer only recognises reserved symbols as complete operator-symbol runs.
    for info in punctuation::PUNCTUATION {
        if matches!(info.category, PunctuationCategory::Symbol | PunctuationCategory::Arrow) {
            assert!(
                info.canonical.chars().all(chars::is_operator_symbol),
                "{:?} is not an operator-symbol run",
                info.canonical
            );
            assert_eq!(punctuation::reserved_symbol(info.canonical), Some(info.id));
        }
    }
}

#[test]
fn precedence_categories_present_exactly_once() {
    use PrecedenceId::*;
    let all = [
        Control,
        QualifiedTypePath,
        Lambda,
        BindingDeclaration,
        WhileHeader,
        BindingDefinition,
        Assignment,
        CaseArm,
        QualifiedValuePath,
        UnitLiteral,
        TypeAscription,
        Postfix,
        ColonCall,
        Infix,
        ConstructorApplication,
        Prefix,
        Call,
        FieldAccess,
        LocalBinding,
    ];
    assert_eq!(precedence::PRECEDENCE.len(), all.len());
    assert_eq!(PrecedenceId::COUNT, all.len());
    for (i, id) in all.into_iter().enumerate() {
        assert_eq!(id.index(), i);
        assert_eq!(precedence::FLIX.info(id).id, id);
        let count = precedence::PRECEDENCE.iter().filter(|e| e.id == id).count();
        assert_eq!(count, 1, "{id:?} appears {count} times");
    }
}
