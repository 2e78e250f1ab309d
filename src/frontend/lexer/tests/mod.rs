//! Lexer unit tests

use crate::frontend::lexer::{tokenize, Lexer, Literal, Scan, TokenKind};
use num_bigint::BigInt;
use num_rational::BigRational;

fn kinds(src: &str) -> Vec<TokenKind> {
    let (tokens, errors) = tokenize("t.ng", src);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    tokens.into_iter().map(|t| t.kind).collect()
}

mod lexer_basic_tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \t\n\r\n "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let (tokens, _) = tokenize("t.ng", "func methodik x_1 héllo");
        assert_eq!(tokens[0].kind, TokenKind::Func);
        assert_eq!(tokens[1].kind, TokenKind::Methodik);
        assert_eq!(tokens[2].ident(), Some("x_1"));
        assert_eq!(tokens[3].ident(), Some("héllo"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+= ++ <- <= := ... && || ^= {| |}"),
            vec![
                TokenKind::AddAssign,
                TokenKind::Inc,
                TokenKind::ChanOp,
                TokenKind::LessEqual,
                TokenKind::Define,
                TokenKind::Ellipsis,
                TokenKind::LogicalAnd,
                TokenKind::LogicalOr,
                TokenKind::PowAssign,
                TokenKind::LeftBraceTable,
                TokenKind::RightBraceTable,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let (tokens, _) = tokenize("t.ng", "x :=\n  42");
        assert_eq!((tokens[0].pos.line, tokens[0].pos.column), (1, 1));
        assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (1, 3));
        assert_eq!((tokens[2].pos.line, tokens[2].pos.column), (2, 3));
        assert_eq!(&*tokens[2].pos.filename, "t.ng");
    }

    #[test]
    fn test_comments_are_tokens() {
        assert_eq!(
            kinds("x // trailing\n/* block */ y"),
            vec![
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Semicolon,
                TokenKind::Comment,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }
}

mod lexer_literal_tests {
    use super::*;

    fn literal(src: &str) -> Literal {
        let (tokens, errors) = tokenize("t.ng", src);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        tokens[0].literal.clone().expect("literal")
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(literal("42"), Literal::Int(BigInt::from(42)));
        assert_eq!(literal("0x_ff"), Literal::Int(BigInt::from(255)));
        assert_eq!(literal("0o17"), Literal::Int(BigInt::from(15)));
        assert_eq!(literal("0755"), Literal::Int(BigInt::from(493)));
        assert_eq!(literal("0b1010"), Literal::Int(BigInt::from(10)));
        assert_eq!(literal("1_000_000"), Literal::Int(BigInt::from(1_000_000)));
    }

    #[test]
    fn test_big_integer_literal() {
        let big = "123456789012345678901234567890";
        assert_eq!(
            literal(big),
            Literal::Int(BigInt::parse_bytes(big.as_bytes(), 10).unwrap())
        );
    }

    #[test]
    fn test_float_literals_are_exact() {
        let tenth = BigRational::new(BigInt::from(1), BigInt::from(10));
        assert_eq!(literal("0.1"), Literal::Float(tenth.clone()));
        assert_eq!(literal(".1"), Literal::Float(tenth));
        assert_eq!(
            literal("2.5e3"),
            Literal::Float(BigRational::from_integer(BigInt::from(2500)))
        );
        assert_eq!(
            literal("1e-2"),
            Literal::Float(BigRational::new(BigInt::from(1), BigInt::from(100)))
        );
    }

    #[test]
    fn test_imaginary_literal() {
        assert_eq!(
            literal("3i"),
            Literal::Imaginary(BigRational::from_integer(BigInt::from(3)))
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(literal(r#""a\tb\n\x41é""#), Literal::String("a\tb\nAé".into()));
        assert_eq!(literal("`raw\\n`"), Literal::String("raw\\n".into()));
        assert_eq!(literal(r"'\n'"), Literal::Rune('\n'));
        assert_eq!(literal("'世'"), Literal::Rune('世'));
    }

    #[test]
    fn test_bad_literals_report_errors() {
        for src in ["09", "1e", "\"open", "'ab'", r#""\q""#] {
            let (tokens, errors) = tokenize("t.ng", src);
            assert!(!errors.is_empty(), "expected error for {:?}", src);
            assert!(tokens.iter().any(|t| t.kind == TokenKind::Unknown || t.kind == TokenKind::String));
        }
    }

    #[test]
    fn test_nul_and_bom_rejected() {
        let (tokens, errors) = tokenize("t.ng", "x\0y");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(errors[0].message, "illegal character NUL");

        let (_, errors) = tokenize("t.ng", "\u{feff}x");
        assert_eq!(errors[0].message, "illegal byte order mark");
    }
}

mod lexer_semicolon_tests {
    use super::*;

    #[test]
    fn test_semicolon_after_ident() {
        let (tokens, _) = tokenize("t.ng", "x\ny");
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert!(tokens[1].is_inserted());
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        assert_eq!(
            kinds("x +\ny"),
            vec![
                TokenKind::Ident,
                TokenKind::Add,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_semicolon_after_keywords_and_closers() {
        for src in ["return\n", "break\n", "f()\n", "a[0]\n", "x++\n", "}\n"] {
            let ks = kinds(src);
            assert_eq!(ks[ks.len() - 2], TokenKind::Semicolon, "source {:?}", src);
        }
    }

    #[test]
    fn test_explicit_semicolon_not_inserted() {
        let (tokens, _) = tokenize("t.ng", "x;");
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert!(!tokens[1].is_inserted());
    }
}

mod lexer_shell_tests {
    use super::*;

    #[test]
    fn test_shell_words_and_pipes() {
        let (tokens, errors) = tokenize("t.ng", "$$ ls -l | grep 'a b' $$");
        assert!(errors.is_empty());
        let ks: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            ks,
            vec![
                TokenKind::Shell,
                TokenKind::ShellWord,
                TokenKind::ShellWord,
                TokenKind::ShellPipe,
                TokenKind::ShellWord,
                TokenKind::ShellWord,
                TokenKind::Shell,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[5].ident(), Some("'a b'"));
    }

    #[test]
    fn test_shell_redirects_and_lists() {
        assert_eq!(
            kinds("$$ a >> out 2>&1 && b &> log; c &\n$$"),
            vec![
                TokenKind::Shell,
                TokenKind::ShellWord,
                TokenKind::TwoGreater,
                TokenKind::ShellWord,
                TokenKind::ShellWord,
                TokenKind::GreaterAnd,
                TokenKind::ShellWord,
                TokenKind::LogicalAnd,
                TokenKind::ShellWord,
                TokenKind::AndGreater,
                TokenKind::ShellWord,
                TokenKind::Semicolon,
                TokenKind::ShellWord,
                TokenKind::Ref,
                TokenKind::ShellNewline,
                TokenKind::Shell,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_shell() {
        let (tokens, errors) = tokenize("t.ng", "$$ ls");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(errors[0].message, "unterminated shell expression");
    }
}

mod lexer_incremental_tests {
    use super::*;

    #[test]
    fn test_need_more_inside_token() {
        let mut lexer = Lexer::new("repl");
        lexer.feed(b"\"abc");
        assert_eq!(lexer.next_token(), Scan::NeedMore);
        lexer.feed(b"\"\n");
        match lexer.next_token() {
            Scan::Token(t) => assert_eq!(t.literal, Some(Literal::String("abc".into()))),
            Scan::NeedMore => panic!("string should be complete"),
        }
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::Semicolon));
        assert_eq!(lexer.next_token(), Scan::NeedMore);
        lexer.close();
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::Eof));
    }

    #[test]
    fn test_need_more_inside_multibyte_char() {
        let bytes = "é".as_bytes();
        let mut lexer = Lexer::new("repl");
        lexer.feed(&bytes[..1]);
        assert_eq!(lexer.next_token(), Scan::NeedMore);
        lexer.feed(&bytes[1..]);
        lexer.close();
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.ident() == Some("é")));
        assert!(lexer.errors().is_empty());
    }

    #[test]
    fn test_shell_state_survives_lines() {
        let mut lexer = Lexer::new("repl");
        lexer.feed(b"$$ ls\n");
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::Shell));
        assert!(lexer.in_shell());
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::ShellWord));
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::ShellNewline));
        assert_eq!(lexer.next_token(), Scan::NeedMore);
        lexer.feed(b"$$\n");
        assert!(matches!(lexer.next_token(), Scan::Token(t) if t.kind == TokenKind::Shell));
        assert!(!lexer.in_shell());
    }
}
