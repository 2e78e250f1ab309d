//! Property tests over the lexer, printer, type relations and constants

use neugram::frontend::lexer::tokenize;
use neugram::frontend::parser::parse;
use neugram::frontend::parser::printer::print_file;
use neugram::frontend::types::{equal, underlying, Basic, ChanDir, FuncType, Type};
use neugram::Compiler;
use proptest::prelude::*;

fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}",
        "[1-9][0-9]{0,5}",
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("==".to_string()),
        Just("<=".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just(",".to_string()),
        Just("\"str\"".to_string()),
    ]
}

fn basic_strategy() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Basic(Basic::Int)),
        Just(Type::Basic(Basic::Int32)),
        Just(Type::Basic(Basic::Float64)),
        Just(Type::Basic(Basic::String)),
        Just(Type::Basic(Basic::Bool)),
    ]
}

fn type_strategy() -> impl Strategy<Value = Type> {
    basic_strategy().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::slice),
            inner.clone().prop_map(Type::pointer),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| Type::map(k, v)),
            inner.clone().prop_map(|t| Type::Chan(ChanDir::Both, Box::new(t))),
            (inner.clone(), inner).prop_map(|(p, r)| Type::func(FuncType::new(vec![p], vec![r]))),
        ]
    })
}

fn operand_strategy() -> impl Strategy<Value = i64> {
    -100_000i64..100_000
}

proptest! {
    #[test]
    fn tokens_partition_source(words in prop::collection::vec(word_strategy(), 1..20)) {
        let src = words.join(" ");
        let (tokens, _) = tokenize("p.ng", &src);
        let joined: String = tokens
            .iter()
            .filter(|t| t.start < t.end)
            .map(|t| &src[t.start..t.end])
            .collect();
        let expected: String = src.split_whitespace().collect();
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn equal_is_reflexive_and_symmetric(a in type_strategy(), b in type_strategy()) {
        prop_assert!(equal(&a, &a));
        prop_assert_eq!(equal(&a, &b), equal(&b, &a));
    }

    #[test]
    fn underlying_is_idempotent(t in type_strategy()) {
        let once = underlying(&t);
        prop_assert!(equal(&underlying(&once), &once));
    }

    #[test]
    fn constant_folding_matches_i64(
        a in operand_strategy(),
        b in operand_strategy(),
        op in prop_oneof![Just("+"), Just("-"), Just("*")],
    ) {
        let src = format!("const c = ({}) {} ({})\n", a, op, b);
        let mut compiler = Compiler::new();
        let result = compiler.check_source("p.ng", &src);
        prop_assert!(result.is_ok(), "{:?}", result.err().map(|e| e.to_string()));
        let expected = match op {
            "+" => a + b,
            "-" => a - b,
            _ => a * b,
        };
        let value = compiler
            .checker()
            .lookup("c")
            .and_then(|o| o.value.as_ref())
            .and_then(|v| v.as_i64());
        prop_assert_eq!(value, Some(expected));
    }

    #[test]
    fn printing_is_stable(
        name in "[a-z][a-z0-9]{0,4}",
        a in 0u32..1000,
        b in 0u32..1000,
        op in prop_oneof![Just("+"), Just("*"), Just("<"), Just("==")],
    ) {
        let src = format!("x_{} := ({} {} {}) {} {}\n", name, a, op, b, op, a);
        let (first, errors) = parse("p.ng", &src);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let printed = print_file(&first);
        let (second, errors) = parse("p.ng", &printed);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(print_file(&second), printed);
    }
}
