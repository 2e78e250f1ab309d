//! Type checking errors
//!
//! Every problem the checker finds is a [`TypeError`]. Errors are rendered
//! into [`Diagnostic`]s as soon as they are recorded, so the variants only
//! carry what the message needs.

use thiserror::Error;

use crate::frontend::types::constant::ConstError;
use crate::util::diagnostic::Diagnostic;
use crate::util::span::Pos;

/// Type error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("undeclared identifier: {0}")]
    Undeclared(String),

    #[error("undefined: {pkg}.{name}")]
    UndefinedMember { pkg: String, name: String },

    #[error("{name} redeclared in this block")]
    Redeclared { name: String },

    #[error("no new variables on left side of :=")]
    NoNewVariables,

    #[error("cannot use {value} (type {found}) as type {expected} in {context}")]
    Mismatch {
        value: String,
        found: String,
        expected: String,
        context: &'static str,
    },

    #[error("assignment count mismatch: {left} = {right}")]
    AssignCount { left: usize, right: usize },

    #[error("{0} used as value")]
    NotValue(String),

    #[error("{0} is not a type")]
    NotType(String),

    #[error("cannot assign to {0}")]
    NotAssignable(String),

    #[error("missing type or value in var declaration of {0}")]
    MissingTypeOrValue(String),

    #[error("const initializer {0} is not a constant")]
    NotConstant(String),

    #[error("missing value in const declaration")]
    MissingConstValue,

    #[error("{0}")]
    Const(#[from] ConstError),

    #[error("invalid operation: {expr} (mismatched types {left} and {right})")]
    MismatchedOperands {
        expr: String,
        left: String,
        right: String,
    },

    #[error("invalid operation: operator {op} not defined on {value} (type {ty})")]
    OperatorNotDefined {
        op: &'static str,
        value: String,
        ty: String,
    },

    #[error("invalid comparison: {0}")]
    NilComparison(String),

    #[error("non-bool {expr} (type {ty}) used as {context} condition")]
    NonBoolCondition {
        expr: String,
        ty: String,
        context: &'static str,
    },

    #[error("too many arguments in call to {func}: have {have}, want {want}")]
    TooManyArguments { func: String, have: usize, want: usize },

    #[error("not enough arguments in call to {func}: have {have}, want {want}")]
    NotEnoughArguments { func: String, have: usize, want: usize },

    #[error("cannot call non-function {expr} (type {ty})")]
    NotCallable { expr: String, ty: String },

    #[error("cannot use ... in call to non-variadic {0}")]
    NonVariadicSpread(String),

    #[error("cannot use ... with multi-valued {0}")]
    MultiValueSpread(String),

    #[error("multiple-value {0} in single-value context")]
    MultiValue(String),

    #[error("{0} (no value) used as value")]
    NoValue(String),

    #[error("too many arguments to conversion to {0}")]
    ConversionArity(String),

    #[error("cannot convert {value} (type {from}) to type {to}")]
    Conversion {
        value: String,
        from: String,
        to: String,
    },

    #[error("invalid argument {arg} (type {ty}) for {builtin}")]
    BuiltinArgument {
        arg: String,
        ty: String,
        builtin: &'static str,
    },

    #[error("first argument to append must be slice; have {0}")]
    AppendNonSlice(String),

    #[error("invalid operation: {0} (cannot close receive-only channel)")]
    CloseRecvOnly(String),

    #[error("invalid operation: {0} (send to receive-only channel)")]
    SendRecvOnly(String),

    #[error("invalid operation: {0} (receive from send-only channel)")]
    RecvSendOnly(String),

    #[error("invalid operation: {expr} (send to non-chan type {ty})")]
    SendNonChan { expr: String, ty: String },

    #[error("invalid operation: {expr} (receive from non-chan type {ty})")]
    RecvNonChan { expr: String, ty: String },

    #[error("{expr} undefined (type {ty} has no field or method {name})")]
    NoFieldOrMethod {
        expr: String,
        ty: String,
        name: String,
    },

    #[error("invalid operation: {expr} (type {ty} does not support indexing)")]
    NotIndexable { expr: String, ty: String },

    #[error("invalid argument: index {index} out of bounds [0:{len}]")]
    IndexOutOfRange { index: String, len: i64 },

    #[error("invalid index {index} (type {ty} must be integer)")]
    NonIntegerIndex { index: String, ty: String },

    #[error("cannot take address of {0}")]
    NotAddressable(String),

    #[error("invalid indirect of {expr} (type {ty})")]
    InvalidIndirect { expr: String, ty: String },

    #[error("invalid composite literal type {0}")]
    InvalidCompositeLiteral(String),

    #[error("{0}")]
    CompositeLiteral(String),

    #[error("{ty} does not implement {iface} ({reason})")]
    NotImplemented {
        ty: String,
        iface: String,
        reason: String,
    },

    #[error("invalid type assertion: {expr} (non-interface type {ty} on left)")]
    AssertNonInterface { expr: String, ty: String },

    #[error("impossible type assertion: {ty} does not implement {iface} ({reason})")]
    ImpossibleAssertion {
        ty: String,
        iface: String,
        reason: String,
    },

    #[error("cannot type switch on non-interface value {expr} (type {ty})")]
    TypeSwitchNonInterface { expr: String, ty: String },

    #[error("impossible type switch case: {expr} (type {ty}) cannot have dynamic type {case} ({reason})")]
    ImpossibleTypeSwitchCase {
        expr: String,
        ty: String,
        case: String,
        reason: String,
    },

    #[error("duplicate case {0} in switch")]
    DuplicateCase(String),

    #[error("multiple defaults in switch")]
    MultipleDefaults,

    #[error("invalid case {case} in switch on {tag} (mismatched types {case_ty} and {tag_ty})")]
    CaseMismatch {
        case: String,
        tag: String,
        case_ty: String,
        tag_ty: String,
    },

    #[error("too many return values: have {have}, want {want}")]
    TooManyReturns { have: usize, want: usize },

    #[error("not enough return values: have {have}, want {want}")]
    NotEnoughReturns { have: usize, want: usize },

    #[error("cannot range over {expr} (type {ty})")]
    InvalidRange { expr: String, ty: String },

    #[error("range over {0} permits only one iteration variable")]
    RangeVariables(String),

    #[error("expression in {0} must be function call")]
    NotCall(&'static str),

    #[error("{0} is not a package")]
    NotPackage(String),

    #[error("cannot refer to unexported name {0}")]
    Unexported(String),

    #[error("{0} not in a loop")]
    BranchOutsideLoop(&'static str),

    #[error("invalid {kind} label {label}")]
    InvalidBranchLabel { kind: &'static str, label: String },

    #[error("label {0} not defined")]
    UndefinedLabel(String),

    #[error("label {0} already defined")]
    DuplicateLabel(String),

    #[error("fallthrough statement out of place")]
    MisplacedFallthrough,

    #[error("cannot elide error into named result {0}")]
    ElideNamedResult(String),

    #[error("interface method {0} cannot use num")]
    InterfaceNum(String),

    #[error("cannot infer num from arguments to {0}")]
    CannotInferNum(String),

    #[error("invalid recursive type {0}")]
    RecursiveType(String),

    #[error("use of .(type) outside type switch")]
    TypeSwitchOutside,

    #[error("cannot embed non-interface type {0}")]
    EmbedNonInterface(String),

    #[error("select case must be receive, send or assign recv")]
    SelectCase,

    #[error("use of untyped nil in {0}")]
    UntypedNil(&'static str),

    #[error("non-name {0} on left side of :=")]
    NonName(String),
}

impl TypeError {
    /// Render the error at a position
    pub fn at(
        self,
        pos: Pos,
    ) -> Diagnostic {
        Diagnostic::typecheck(pos, self.to_string())
    }
}
