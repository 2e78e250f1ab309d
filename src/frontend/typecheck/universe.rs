//! The universe scope
//!
//! Names visible everywhere: the basic types, `error`, `true`, `false`,
//! `nil`, the `env` and `alias` maps, the print helpers and the builtin
//! functions. Shared by every checker in the process.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{
    Basic, Builtin, FuncType, InterfaceType, NamedRef, NamedType, Type,
};
use crate::util::span::Pos;

use super::scope::{Obj, ObjKind};

pub static UNIVERSE: Lazy<Universe> = Lazy::new(Universe::build);

/// Process-wide predeclared names
#[derive(Debug)]
pub struct Universe {
    objs: IndexMap<String, Obj>,
    error: NamedRef,
}

impl Universe {
    fn build() -> Self {
        let mut objs = IndexMap::new();
        let mut add = |obj: Obj| {
            objs.insert(obj.name.clone(), obj);
        };

        for name in [
            "bool", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
            "uint64", "uintptr", "float32", "float64", "complex64", "complex128", "string",
            "byte", "rune", "num",
        ] {
            if let Some(basic) = Basic::from_name(name) {
                add(Obj::type_name(name, Type::Basic(basic), Pos::dummy()));
            }
        }

        let error = NamedType::new("error", "");
        let mut methods = BTreeMap::new();
        methods.insert(
            "Error".to_string(),
            FuncType::new(Vec::new(), vec![Type::Basic(Basic::String)]),
        );
        error.set_underlying(Type::Interface(Box::new(InterfaceType {
            methods,
            embeds: Vec::new(),
        })));
        add(Obj::type_name("error", Type::Named(error.clone()), Pos::dummy()));

        add(Obj::constant(
            "true",
            Type::Basic(Basic::UntypedBool),
            Some(ConstValue::Bool(true)),
            Pos::dummy(),
        ));
        add(Obj::constant(
            "false",
            Type::Basic(Basic::UntypedBool),
            Some(ConstValue::Bool(false)),
            Pos::dummy(),
        ));
        add(Obj::new(
            "nil",
            ObjKind::Const,
            Type::Basic(Basic::UntypedNil),
            Pos::dummy(),
        ));

        let string_map = || Type::map(Type::Basic(Basic::String), Type::Basic(Basic::String));
        add(Obj::var("env", string_map(), Pos::dummy()));
        add(Obj::var("alias", string_map(), Pos::dummy()));

        let any = Type::slice(Type::empty_interface());
        let string = Type::Basic(Basic::String);
        add(Obj::var(
            "print",
            Type::func(FuncType::variadic(vec![any.clone()], Vec::new())),
            Pos::dummy(),
        ));
        add(Obj::var(
            "printf",
            Type::func(FuncType::variadic(vec![string.clone(), any.clone()], Vec::new())),
            Pos::dummy(),
        ));
        add(Obj::var(
            "errorf",
            Type::func(FuncType::variadic(
                vec![string, any],
                vec![Type::Named(error.clone())],
            )),
            Pos::dummy(),
        ));

        for builtin in Builtin::ALL {
            add(Obj::var(builtin.name(), Type::Builtin(*builtin), Pos::dummy()));
        }

        Self { objs, error }
    }

    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&Obj> {
        self.objs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objs.keys().map(String::as_str)
    }
}

/// The predeclared `error` interface
pub fn error_type() -> Type {
    Type::Named(UNIVERSE.error.clone())
}

/// Check whether a type is the predeclared `error`
pub fn is_error(t: &Type) -> bool {
    matches!(t, Type::Named(n) if n.id() == UNIVERSE.error.id())
}
