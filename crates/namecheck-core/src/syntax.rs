//! The syntax-unit data contract supplied by an external front-end.
//!
//! namecheck does not parse source text or infer types. A front-end
//! compiles a target, resolves types, and dumps each compilation unit in
//! the shape below; the walker and dispatcher consume it read-only. The
//! tree distinguishes only the declaration forms that introduce named
//! bindings; plain references, imports, and expression statements are not
//! part of the contract.

use crate::diagnostics::Position;
use serde::Deserialize;
use std::fmt;

/// One compiled unit (a package or module) with resolved types.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceUnit {
    /// Unique compilation id, distinct per test variant.
    pub id: String,
    /// Import path the unit's type strings are rendered relative to.
    pub path: String,
    /// Which compilation variant this unit is.
    #[serde(default)]
    pub kind: UnitKind,
    /// Source files in the unit.
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// Compilation variant of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// The unit's normal compilation.
    #[default]
    Normal,
    /// The unit compiled together with its test sources.
    WithTests,
    /// A synthesized test harness unit; never analyzed.
    TestMain,
}

/// A single source file's top-level declarations.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceFile {
    /// File name, informational.
    pub name: String,
    /// Top-level declarations in source order.
    #[serde(default)]
    pub decls: Vec<Decl>,
}

/// A top-level declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    /// A function or method declaration.
    Func(FuncDecl),
    /// A variable or constant declaration group.
    Value(ValueDecl),
    /// A type declaration.
    Type(TypeDecl),
}

/// A function-like declaration: named function, method, or literal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuncDecl {
    /// Declared name; empty for anonymous function literals.
    #[serde(default)]
    pub name: String,
    /// Method receiver binding, if any.
    #[serde(default)]
    pub receiver: Option<Binding>,
    /// Parameter bindings in declaration order.
    #[serde(default)]
    pub params: Vec<Binding>,
    /// Named result bindings, when the declaration has them.
    #[serde(default)]
    pub results: Vec<Binding>,
    /// Function body; absent for bodyless declarations.
    #[serde(default)]
    pub body: Option<Vec<Stmt>>,
}

/// A variable or constant declaration group introducing bindings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueDecl {
    /// Bindings introduced by the declaration.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// A type declaration. Only structural types are descended into; the
/// declared name itself is not a checked binding.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDecl {
    /// The declared type name.
    pub name: String,
    /// Struct body, when the declared type is structural.
    #[serde(default, rename = "struct")]
    pub strukt: Option<StructType>,
}

/// A struct type body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructType {
    /// Field groups in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One field group: names sharing a declared type, or an anonymous nested
/// struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Field {
    /// Field names sharing the declared type.
    #[serde(default)]
    pub names: Vec<Binding>,
    /// Present when the field's type is an anonymous struct literal; the
    /// walker descends into it instead of reporting `names`.
    #[serde(default)]
    pub nested: Option<StructType>,
}

/// A statement, reduced to the binding-relevant forms. Front-ends flatten
/// loop and conditional bodies into [`Stmt::Block`] entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Short-form declare-and-assign. Mixed statements mark re-assigned
    /// names with `defines: false`.
    ShortDecl(ValueDecl),
    /// Block-scoped variable or constant declaration.
    VarDecl(ValueDecl),
    /// A local type declaration.
    TypeDecl(TypeDecl),
    /// An anonymous function literal.
    FuncLit(FuncDecl),
    /// A nested block.
    Block(Vec<Stmt>),
}

/// A single named binding site with its resolved type.
#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    /// The identifier.
    pub name: String,
    /// Source position of the identifier.
    pub pos: Position,
    /// Resolved type; `None` when the front-end could not resolve one.
    #[serde(default)]
    pub ty: Option<TypeRef>,
    /// False when this occurrence re-assigns an existing binding instead
    /// of defining a new one.
    #[serde(default = "default_true")]
    pub defines: bool,
}

fn default_true() -> bool {
    true
}

/// A resolved type as rendered by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A named or structural type, rendered relative to the unit's
    /// namespace.
    Named(String),
    /// An indirection wrapper around an underlying type.
    Pointer(Box<TypeRef>),
}

impl TypeRef {
    /// Strips indirection wrappers down to the underlying type, so a
    /// pointer-to-pointer-to-T is treated exactly like T.
    #[must_use]
    pub fn strip_pointers(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(elem) => elem.strip_pointers(),
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(display) => f.write_str(display),
            TypeRef::Pointer(elem) => write!(f, "*{elem}"),
        }
    }
}
