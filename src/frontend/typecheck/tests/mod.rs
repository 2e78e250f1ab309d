//! Type checker tests

mod basic;
mod decl;
mod scenarios;
mod scope;
mod stmt;

use crate::frontend::parser::ast::File;
use crate::frontend::parser::parse;
use crate::frontend::typecheck::Checker;

/// Check a source that must be free of errors
pub(super) fn check_ok(src: &str) -> (Checker, File) {
    let (mut file, errors) = parse("t.ng", src);
    assert!(errors.is_empty(), "parse errors for {:?}: {:?}", src, errors);
    let mut checker = Checker::new();
    if let Err(errors) = checker.check_file(&mut file) {
        panic!("unexpected type errors for {:?}: {}", src, errors);
    }
    (checker, file)
}

/// Type error messages produced for a source
pub(super) fn check_errors(src: &str) -> Vec<String> {
    let (mut file, errors) = parse("t.ng", src);
    assert!(errors.is_empty(), "parse errors for {:?}: {:?}", src, errors);
    let mut checker = Checker::new();
    match checker.check_file(&mut file) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.diagnostics.into_iter().map(|d| d.message).collect(),
    }
}

/// Assert that some error message contains `needle`
pub(super) fn assert_error(
    src: &str,
    needle: &str,
) {
    let errors = check_errors(src);
    assert!(
        errors.iter().any(|e| e.contains(needle)),
        "expected an error containing {:?} for {:?}, got {:?}",
        needle,
        src,
        errors
    );
}

/// Type of a variable after checking
pub(super) fn type_of_var(
    checker: &Checker,
    name: &str,
) -> String {
    match checker.lookup(name) {
        Some(obj) => obj.ty.to_string(),
        None => panic!("{} is not declared", name),
    }
}
