//! Type model and constant tests

use super::constant::{format_rat, rat_to_f64, ConstError, ConstValue};
use super::*;
use crate::frontend::lexer::tokens::TokenKind;
use num_bigint::BigInt;
use num_rational::BigRational;

fn int() -> Type {
    Type::Basic(Basic::Int)
}

mod equality_tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::slice(int()), Type::slice(int()));
        assert_ne!(Type::slice(int()), Type::Table(Box::new(int())));
        assert_eq!(
            Type::map(Type::Basic(Basic::String), int()),
            Type::map(Type::Basic(Basic::String), int())
        );
        assert_ne!(
            Type::Chan(ChanDir::Send, Box::new(int())),
            Type::Chan(ChanDir::Both, Box::new(int()))
        );
    }

    #[test]
    fn test_named_identity() {
        let a = NamedType::with_underlying("T", "", int());
        let b = NamedType::with_underlying("T", "", int());
        assert_eq!(Type::Named(a.clone()), Type::Named(a.clone()));
        assert_ne!(Type::Named(a), Type::Named(b));
    }

    #[test]
    fn test_float_width_equality() {
        let float = Type::Basic(Basic::Float);
        assert_eq!(float, Type::Basic(Basic::Float32));
        assert_eq!(Type::Basic(Basic::Float64), float);
        assert_ne!(Type::Basic(Basic::Float32), Type::Basic(Basic::Float64));
        assert_eq!(Type::Basic(Basic::Complex), Type::Basic(Basic::Complex128));
        assert_ne!(Type::Basic(Basic::UntypedFloat), Type::Basic(Basic::Float64));
    }

    #[test]
    fn test_alias_is_transparent() {
        let alias = Type::Alias(Arc::new(AliasType {
            name: "byte".into(),
            ty: Type::Basic(Basic::Uint8),
        }));
        assert_eq!(alias, Type::Basic(Basic::Uint8));
        assert_eq!(unalias(&alias), Type::Basic(Basic::Uint8));
    }

    #[test]
    fn test_func_equality_ignores_free_vars() {
        let mut f = FuncType::new(vec![int()], vec![int()]);
        let g = f.clone();
        f.free_vars.push("x".into());
        assert_eq!(f, g);
        assert_ne!(f, FuncType::variadic(vec![Type::slice(int())], vec![int()]));
    }
}

mod underlying_tests {
    use super::*;

    #[test]
    fn test_underlying_is_idempotent() {
        let n = NamedType::with_underlying("Point", "", Type::slice(int()));
        let t = Type::Named(n);
        let u = underlying(&t);
        assert_eq!(u, Type::slice(int()));
        assert_eq!(underlying(&u), u);
        assert_eq!(unalias(&unalias(&t)), t);
    }

    #[test]
    fn test_recursive_named_type() {
        let list = NamedType::new("List", "");
        list.set_underlying(Type::Struct(Box::new(StructType {
            fields: vec![Field {
                name: "next".into(),
                ty: Type::pointer(Type::Named(list.clone())),
                embedded: false,
            }],
            spec: Spec::default(),
        })));
        let t = Type::Named(list);
        assert!(!is_generic(&t));
        assert_eq!(t.to_string(), "List");
        assert_eq!(underlying(&t).to_string(), "struct{next *List}");
    }

    #[test]
    fn test_generic_scan() {
        let f = FuncType::new(vec![Type::Basic(Basic::Num)], vec![]);
        assert!(is_generic_func(&f));
        let n = NamedType::with_underlying(
            "Vec",
            "",
            Type::slice(Type::Basic(Basic::Num)),
        );
        assert!(is_generic(&Type::pointer(Type::Named(n))));
        assert!(!is_generic(&Type::slice(int())));
    }
}

mod display_tests {
    use super::*;

    #[test]
    fn test_display() {
        let f = FuncType::variadic(
            vec![Type::Basic(Basic::String), Type::slice(Type::empty_interface())],
            vec![int(), Type::Basic(Basic::Bool)],
        );
        assert_eq!(Type::func(f).to_string(), "func(string, ...interface{}) (int, bool)");
        assert_eq!(Type::Chan(ChanDir::Recv, Box::new(int())).to_string(), "<-chan int");
        assert_eq!(Type::Table(Box::new(int())).to_string(), "[|]int");
        assert_eq!(
            Type::Array {
                len: 3,
                elem: Box::new(int()),
                ellipsis: false
            }
            .to_string(),
            "[3]int"
        );
    }
}

mod constant_tests {
    use super::*;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_int64_bounds() {
        let two = ConstValue::int(2);
        let max = two
            .binary(TokenKind::Pow, &ConstValue::int(63))
            .unwrap()
            .binary(TokenKind::Sub, &ConstValue::int(1))
            .unwrap();
        assert!(max.represent(Basic::Int64).is_ok());
        let over = two.binary(TokenKind::Pow, &ConstValue::int(63)).unwrap();
        assert!(matches!(
            over.represent(Basic::Int64),
            Err(ConstError::Overflow { ty: "int64", .. })
        ));
        assert!(over.represent(Basic::Uint64).is_ok());
    }

    #[test]
    fn test_float_overflow() {
        let big = ConstValue::Float(BigRational::from_integer(num_traits::pow(
            BigInt::from(10),
            400,
        )));
        assert!(matches!(
            big.represent(Basic::Float64),
            Err(ConstError::Overflow { .. })
        ));
        assert!(big.represent(Basic::UntypedFloat).is_ok());
    }

    #[test]
    fn test_float32_rounds() {
        let tenth = ConstValue::Float(rat(1, 10));
        match tenth.represent(Basic::Float32).unwrap() {
            ConstValue::Float(f) => assert_eq!(rat_to_f64(&f) as f32, 0.1f32),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_truncation() {
        assert!(matches!(
            ConstValue::Float(rat(3, 2)).represent(Basic::Int),
            Err(ConstError::Truncated { .. })
        ));
        assert_eq!(
            ConstValue::Float(rat(4, 2)).represent(Basic::Int),
            Ok(ConstValue::int(2))
        );
    }

    #[test]
    fn test_exact_arithmetic() {
        let third = ConstValue::Float(rat(1, 3));
        let sum = third
            .binary(TokenKind::Add, &third)
            .unwrap()
            .binary(TokenKind::Add, &third)
            .unwrap();
        assert_eq!(sum, ConstValue::Float(rat(1, 1)));
        assert_eq!(
            ConstValue::int(7).binary(TokenKind::Div, &ConstValue::int(2)),
            Ok(ConstValue::int(3))
        );
        assert_eq!(
            ConstValue::int(7).binary(TokenKind::Div, &ConstValue::Float(rat(2, 1))),
            Ok(ConstValue::Float(rat(7, 2)))
        );
        assert_eq!(
            ConstValue::int(1).binary(TokenKind::Div, &ConstValue::int(0)),
            Err(ConstError::DivByZero)
        );
    }

    #[test]
    fn test_complex_arithmetic() {
        let i = ConstValue::Complex(rat(0, 1), rat(1, 1));
        assert_eq!(
            i.binary(TokenKind::Mul, &i),
            Ok(ConstValue::Complex(rat(-1, 1), rat(0, 1)))
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            ConstValue::int(1).compare(TokenKind::Less, &ConstValue::Float(rat(3, 2))),
            Ok(true)
        );
        assert_eq!(
            ConstValue::String("a".into()).compare(TokenKind::Equal, &ConstValue::String("a".into())),
            Ok(true)
        );
        assert!(ConstValue::Bool(true).compare(TokenKind::Less, &ConstValue::Bool(false)).is_err());
    }

    #[test]
    fn test_format_rat() {
        assert_eq!(format_rat(&rat(5, 2)), "2.5");
        assert_eq!(format_rat(&rat(-1, 8)), "-0.125");
        assert_eq!(format_rat(&rat(6, 3)), "2");
        assert_eq!(format_rat(&rat(1, 3)), "0.3333333333333333");
    }

    #[test]
    fn test_brief_shortens_long_integers() {
        let huge = BigInt::from(10).pow(400u32);
        assert_eq!(ConstValue::Int(huge.clone()).brief(), "1e+400");
        assert_eq!(ConstValue::Int(-huge).brief(), "-1e+400");
        let digits: BigInt = "123450000000000000000000000000".parse().unwrap();
        assert_eq!(ConstValue::Int(digits).brief(), "1.2345e+29");
        assert_eq!(ConstValue::int(300).brief(), "300");
        assert_eq!(ConstValue::String("x".into()).brief(), "\"x\"");
    }
}
