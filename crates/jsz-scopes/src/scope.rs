//! The binding-scope node: kind/context flags, symbol table, use table.

use std::fmt;

use crate::symbol::SymbolTable;
use crate::tree::FxIndexMap;
use crate::use_info::UseInfo;
use crate::SymbolId;

/// Scope kind facets. Not mutually exclusive; a scope's kind is a union of
/// these bits (for instance the global scope is
/// `FUNCTION_BODY | GLOBAL | FUNCTION_TOP`).
pub mod scope_flags {
    /// Block scope (a lexical environment).
    pub const BLOCK: u32 = 1 << 0;
    /// Function body scope (a variable environment).
    pub const FUNCTION_BODY: u32 = 1 << 1;
    /// Function parameter scope.
    pub const FUNCTION_PARAMETER: u32 = 1 << 2;
    /// Catch parameter scope.
    pub const CATCH_PARAMETER: u32 = 1 << 3;
    /// Global scope.
    pub const GLOBAL: u32 = 1 << 4;
    /// Module scope.
    pub const MODULE: u32 = 1 << 5;
    /// Outermost scope of a function (parameter scope if present, else body).
    pub const FUNCTION_TOP: u32 = 1 << 6;
    /// Scope of a switch case block.
    pub const SWITCH_BLOCK: u32 = 1 << 7;
    /// Class head scope: the lexical environment containing the class name
    /// binding.
    pub const CLASS_HEAD: u32 = 1 << 8;
    /// Class body scope: the private environment containing private names.
    pub const CLASS_BODY: u32 = 1 << 9;
    /// Scope of a direct `eval` program.
    pub const EVAL: u32 = 1 << 10;
    /// Speculative arrow-function parameter scope, parsed under the cover
    /// grammar. The only killable scope kind.
    pub const ARROW_FUNCTION_PARAMETER: u32 = 1 << 11;
}

/// Context flags inherited or derived when a scope is created. Arrow scopes
/// copy them verbatim from the parent; non-arrow function scopes compute
/// them from the enclosing function's declared kind.
pub mod context_flags {
    /// In a function context; `new.target` is available.
    pub const IN_FUNCTION: u32 = 1 << 16;
    /// In a method context; `super` property accesses are allowed.
    pub const IN_METHOD: u32 = 1 << 17;
    /// In a derived class constructor; `super` calls are allowed.
    pub const IN_DERIVED_CONSTRUCTOR: u32 = 1 << 18;
    /// In a class field initializer; `arguments` is not allowed.
    pub const IN_CLASS_FIELD_INITIALIZER: u32 = 1 << 19;
}

/// Declared-kind flags of the function a scope belongs to, as reported by
/// the binding client when it opens function scopes.
pub mod function_flags {
    /// Arrow function: does not redefine `this`/`super`/`new.target`.
    pub const ARROW: u32 = 1 << 0;
    /// Method definition.
    pub const METHOD: u32 = 1 << 1;
    /// Derived class constructor.
    pub const DERIVED_CONSTRUCTOR: u32 = 1 << 2;
    /// Class field initializer.
    pub const CLASS_FIELD_INITIALIZER: u32 = 1 << 3;
}

/// Index of a [`Scope`] inside a [`crate::ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// A node in the binding-scope tree.
///
/// Corresponds to a LexicalEnvironment or VariableEnvironment. Owns the
/// symbols declared in it (keyed by name, in declaration order) and a
/// lazily-allocated table of free-variable references awaiting resolution.
/// The parent link is a back-pointer only; scopes are owned by the
/// [`crate::ScopeTree`] arena.
#[derive(Debug)]
pub struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) depth: u32,
    pub(crate) kind: u32,
    pub(crate) flags: u32,
    pub(crate) symbols: SymbolTable,
    pub(crate) uses: Option<Box<FxIndexMap<String, UseInfo>>>,
    pub(crate) closed: bool,
    pub(crate) killed: bool,
    pub(crate) has_block_scoped_or_redeclared: bool,
    pub(crate) has_private_names: bool,
    pub(crate) has_closures: bool,
    pub(crate) has_eval: bool,
    pub(crate) has_nested_eval: bool,
}

impl Scope {
    pub(crate) fn new(parent: Option<ScopeId>, depth: u32, kind: u32, flags: u32) -> Self {
        Scope {
            parent,
            depth,
            kind,
            flags,
            symbols: SymbolTable::new(),
            uses: None,
            closed: false,
            killed: false,
            has_block_scoped_or_redeclared: false,
            has_private_names: false,
            has_closures: false,
            has_eval: false,
            has_nested_eval: false,
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Distance from the root scope; the root is at depth 0.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    // Kind facets

    pub fn is_block_scope(&self) -> bool {
        (self.kind & scope_flags::BLOCK) != 0
    }

    pub fn is_function_body_scope(&self) -> bool {
        (self.kind & scope_flags::FUNCTION_BODY) != 0
    }

    pub fn is_function_parameter_scope(&self) -> bool {
        (self.kind & scope_flags::FUNCTION_PARAMETER) != 0
    }

    pub fn is_catch_parameter_scope(&self) -> bool {
        (self.kind & scope_flags::CATCH_PARAMETER) != 0
    }

    pub fn is_global_scope(&self) -> bool {
        (self.kind & scope_flags::GLOBAL) != 0
    }

    pub fn is_module_scope(&self) -> bool {
        (self.kind & scope_flags::MODULE) != 0
    }

    pub fn is_function_top_scope(&self) -> bool {
        (self.kind & scope_flags::FUNCTION_TOP) != 0
    }

    pub fn is_switch_block_scope(&self) -> bool {
        (self.kind & scope_flags::SWITCH_BLOCK) != 0
    }

    pub fn is_class_head_scope(&self) -> bool {
        (self.kind & scope_flags::CLASS_HEAD) != 0
    }

    pub fn is_class_body_scope(&self) -> bool {
        (self.kind & scope_flags::CLASS_BODY) != 0
    }

    pub fn is_eval_scope(&self) -> bool {
        (self.kind & scope_flags::EVAL) != 0
    }

    pub fn is_arrow_function_parameter_scope(&self) -> bool {
        (self.kind & scope_flags::ARROW_FUNCTION_PARAMETER) != 0
    }

    /// A speculative scope that may still be discarded by `kill`.
    pub fn is_killable(&self) -> bool {
        self.is_arrow_function_parameter_scope() && !self.closed
    }

    // Context flags

    pub fn in_function(&self) -> bool {
        (self.flags & context_flags::IN_FUNCTION) != 0
    }

    pub fn in_method(&self) -> bool {
        (self.flags & context_flags::IN_METHOD) != 0
    }

    pub fn in_derived_constructor(&self) -> bool {
        (self.flags & context_flags::IN_DERIVED_CONSTRUCTOR) != 0
    }

    pub fn in_class_field_initializer(&self) -> bool {
        (self.flags & context_flags::IN_CLASS_FIELD_INITIALIZER) != 0
    }

    // Mutable state

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True once the scope was discarded by a failed speculative parse.
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn has_block_scoped_or_redeclared_symbols(&self) -> bool {
        self.has_block_scoped_or_redeclared
    }

    pub fn has_private_names(&self) -> bool {
        self.has_private_names
    }

    pub fn has_closures(&self) -> bool {
        self.has_closures
    }

    pub fn has_eval(&self) -> bool {
        self.has_eval
    }

    pub fn has_nested_eval(&self) -> bool {
        self.has_nested_eval
    }

    // Symbol table

    /// Looks up a symbol declared directly in this scope.
    pub fn get_existing_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name)
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.has(name)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn has_declarations(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// Symbols declared in this scope, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.symbols.iter()
    }

    /// The reference record for `name` currently held by this scope, if any.
    pub fn use_info(&self, name: &str) -> Option<&UseInfo> {
        self.uses.as_ref().and_then(|uses| uses.get(name))
    }

    /// Number of references still pending or settled in the use table.
    pub(crate) fn use_count(&self) -> usize {
        self.uses.as_ref().map_or(0, |uses| uses.len())
    }

    pub(crate) fn uses_mut(&mut self) -> &mut FxIndexMap<String, UseInfo> {
        self.uses.get_or_insert_with(Box::default)
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        if self.is_global_scope() {
            "Global"
        } else if self.is_module_scope() {
            "Module"
        } else if self.is_eval_scope() {
            "Eval"
        } else if self.is_function_body_scope() {
            "Var"
        } else if self.is_arrow_function_parameter_scope() {
            "ArrowParam"
        } else if self.is_function_parameter_scope() {
            "Param"
        } else if self.is_catch_parameter_scope() {
            "Catch"
        } else if self.is_switch_block_scope() {
            "Switch"
        } else if self.is_class_head_scope() {
            "Class"
        } else if self.is_class_body_scope() {
            "Private"
        } else {
            "Block"
        }
    }
}

impl fmt::Display for Scope {
    /// Compact rendering for logs: kind name plus declared names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}Scope(", self.kind_name())?;
        for (i, (name, _)) in self.symbols.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, ")]")
    }
}

/// Derives a new function scope's context flags from the enclosing
/// function's declared kind. Arrow functions propagate the parent scope's
/// flags unchanged; they do not redefine `this`, `super`, or `new.target`.
pub(crate) fn compute_context_flags(parent_flags: u32, function_flags: u32) -> u32 {
    if (function_flags & function_flags::ARROW) != 0 {
        parent_flags
    } else {
        let mut flags = context_flags::IN_FUNCTION;
        if (function_flags & function_flags::METHOD) != 0 {
            flags |= context_flags::IN_METHOD;
        }
        if (function_flags & function_flags::DERIVED_CONSTRUCTOR) != 0 {
            flags |= context_flags::IN_DERIVED_CONSTRUCTOR;
        }
        if (function_flags & function_flags::CLASS_FIELD_INITIALIZER) != 0 {
            flags |= context_flags::IN_CLASS_FIELD_INITIALIZER;
        }
        flags
    }
}
