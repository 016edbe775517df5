//! Scope tree and name binding resolution for the jsz JavaScript frontend.
//!
//! This crate assigns every identifier reference in a program to the binding
//! that declares it (or classifies it as unresolved), while the binding-scope
//! tree is still being built by a single left-to-right parse:
//! - `Symbol`: an attributed binding name with declaration-kind and
//!   usage-outcome flags
//! - `Scope` / `ScopeTree`: the binding-scope tree and the deferred
//!   free-variable resolution algorithm (local resolution, upward
//!   propagation at close, closure classification, speculative-scope abort,
//!   eval taint)
//! - `UseInfo`: pending-or-resolved reference records
//! - `LexicalContext`: the traversal stack used while the immutable syntax
//!   tree is rewritten bottom-up
//!
//! The parser is the only intended caller: it opens scopes through the
//! `create_*` factories, registers declarations and references in lockstep
//! with token consumption, and settles each scope when its construct ends.

pub mod lexical_context;
mod resolve;
pub mod scope;
pub mod stats;
pub mod symbol;
pub mod tree;
pub mod use_info;

pub use lexical_context::{LexicalContext, LexicalContextNode, LexicalNodeKind};
pub use scope::{context_flags, function_flags, scope_flags, Scope, ScopeId};
pub use stats::{ResolutionStats, ValidationError};
pub use symbol::{symbol_flags, Symbol, SymbolArena, SymbolId, SymbolTable};
pub use tree::ScopeTree;
pub use use_info::UseInfo;
