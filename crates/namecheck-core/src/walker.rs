//! Scope-classifying traversal of syntax units.

use crate::diagnostics::Position;
use crate::scope::Scope;
use crate::syntax::{Binding, Decl, FuncDecl, SourceUnit, Stmt, StructType, TypeRef, ValueDecl};

/// A single declaring appearance of an identifier, tagged with its scope.
///
/// Transient: borrows from the syntax unit and is consumed immediately by
/// the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct BindingOccurrence<'a> {
    /// Scope bucket the binding was classified into.
    pub scope: Scope,
    /// The identifier.
    pub name: &'a str,
    /// Source position of the identifier.
    pub pos: &'a Position,
    /// Resolved type, when the front-end resolved one.
    pub ty: Option<&'a TypeRef>,
}

/// Collects every binding occurrence in `unit`, in discovery order.
///
/// Classification:
///
/// - method receivers → [`Scope::Receiver`]
/// - parameters and named results, including those of nested function
///   literals → [`Scope::Param`]
/// - top-level value declarations → [`Scope::Global`]
/// - short declarations (defining occurrences only) and block-scoped
///   value declarations → [`Scope::Local`]
/// - struct members, recursing through anonymous nested structs →
///   [`Scope::Field`]
///
/// Plain references, imports, and type declaration names are not binding
/// occurrences and are never yielded.
#[must_use]
pub fn collect_bindings(unit: &SourceUnit) -> Vec<BindingOccurrence<'_>> {
    let mut out = Vec::new();
    for file in &unit.files {
        for decl in &file.decls {
            match decl {
                Decl::Func(func) => walk_func(func, &mut out),
                Decl::Value(value) => walk_value(value, Scope::Global, &mut out),
                Decl::Type(decl) => {
                    if let Some(strukt) = &decl.strukt {
                        walk_struct(strukt, &mut out);
                    }
                }
            }
        }
    }
    out
}

fn walk_func<'a>(func: &'a FuncDecl, out: &mut Vec<BindingOccurrence<'a>>) {
    if let Some(recv) = &func.receiver {
        push(Scope::Receiver, recv, out);
    }
    for binding in &func.params {
        push(Scope::Param, binding, out);
    }
    for binding in &func.results {
        push(Scope::Param, binding, out);
    }
    if let Some(body) = &func.body {
        walk_stmts(body, out);
    }
}

fn walk_stmts<'a>(stmts: &'a [Stmt], out: &mut Vec<BindingOccurrence<'a>>) {
    for stmt in stmts {
        match stmt {
            Stmt::ShortDecl(decl) => {
                for binding in &decl.bindings {
                    if binding.defines {
                        push(Scope::Local, binding, out);
                    }
                }
            }
            Stmt::VarDecl(decl) => walk_value(decl, Scope::Local, out),
            Stmt::TypeDecl(decl) => {
                if let Some(strukt) = &decl.strukt {
                    walk_struct(strukt, out);
                }
            }
            // A literal's own body is walked as params/locals, never as
            // globals.
            Stmt::FuncLit(func) => walk_func(func, out),
            Stmt::Block(inner) => walk_stmts(inner, out),
        }
    }
}

fn walk_value<'a>(decl: &'a ValueDecl, scope: Scope, out: &mut Vec<BindingOccurrence<'a>>) {
    for binding in &decl.bindings {
        push(scope, binding, out);
    }
}

fn walk_struct<'a>(strukt: &'a StructType, out: &mut Vec<BindingOccurrence<'a>>) {
    for field in &strukt.fields {
        if let Some(nested) = &field.nested {
            // Anonymous struct type: classify its members instead.
            walk_struct(nested, out);
            continue;
        }
        for binding in &field.names {
            push(Scope::Field, binding, out);
        }
    }
}

fn push<'a>(scope: Scope, binding: &'a Binding, out: &mut Vec<BindingOccurrence<'a>>) {
    out.push(BindingOccurrence {
        scope,
        name: &binding.name,
        pos: &binding.pos,
        ty: binding.ty.as_ref(),
    });
}
