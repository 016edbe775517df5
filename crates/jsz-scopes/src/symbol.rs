//! Symbols, symbol flags, and the per-parse symbol arena.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Bit flags describing what a symbol is and how it ended up being used.
///
/// The low bits encode the declaration kind (`LET`/`CONST`/`VAR`, exactly one
/// of which must be set), the middle bits encode fixed attributes assigned at
/// declaration time, and the `USED`/`CLOSED_OVER`/`USED_IN_INNER_SCOPE` bits
/// record the usage outcome computed during resolution.
pub mod symbol_flags {
    /// Declared with `let`.
    pub const LET: u32 = 1 << 0;
    /// Declared with `const`.
    pub const CONST: u32 = 1 << 1;
    /// Declared with `var` (or an equivalent function-scoped form).
    pub const VAR: u32 = 1 << 2;
    /// Mask for the mutually exclusive declaration-kind bits.
    pub const KIND_MASK: u32 = LET | CONST | VAR;

    /// Global (script-level, undeclared-var) binding.
    pub const GLOBAL: u32 = 1 << 3;
    /// Function parameter.
    pub const PARAMETER: u32 = 1 << 4;
    /// The `this` binding.
    pub const THIS: u32 = 1 << 5;
    /// Internal symbol, never spelled out in source code.
    pub const INTERNAL: u32 = 1 << 6;
    /// A function expression's self-reference binding.
    pub const FUNCTION_SELF: u32 = 1 << 7;
    /// A hoistable `var`/function declaration.
    pub const HOISTABLE_DECLARATION: u32 = 1 << 8;
    /// Declared at program (script) level.
    pub const PROGRAM_LEVEL: u32 = 1 << 9;
    /// The declaration has been evaluated. Tracks the temporal dead zone for
    /// block-scoped `LET` and `CONST` symbols only.
    pub const HAS_BEEN_DECLARED: u32 = 1 << 10;
    /// A block function declaration hoisted into the enclosing body scope.
    pub const HOISTED_BLOCK_FUNCTION: u32 = 1 << 11;
    /// A `var` binding that must be initialized from the parent scope's
    /// binding of the same name. Used for parameter bindings replicated in
    /// the function body's variable environment.
    pub const VAR_REDECLARED_HERE: u32 = 1 << 12;
    /// Declared in an unprotected switch case context.
    pub const DECLARED_IN_SWITCH_BLOCK: u32 = 1 << 13;
    /// An indirect import binding of a module environment.
    pub const IMPORT_BINDING: u32 = 1 << 14;
    /// A catch clause parameter binding.
    pub const CATCH_PARAMETER: u32 = 1 << 15;
    /// A block-level function declaration.
    pub const BLOCK_FUNCTION_DECLARATION: u32 = 1 << 16;
    /// A class private name (`#name`).
    pub const PRIVATE_NAME: u32 = 1 << 17;
    /// Private name declared on a static member.
    pub const PRIVATE_NAME_STATIC: u32 = 1 << 18;
    /// Private name declared by a method.
    pub const PRIVATE_NAME_METHOD: u32 = 1 << 19;
    /// Private name declared by an accessor.
    pub const PRIVATE_NAME_ACCESSOR: u32 = 1 << 20;
    /// The function `arguments` binding.
    pub const ARGUMENTS: u32 = 1 << 21;

    /// The symbol is referenced somewhere.
    pub const USED: u32 = 1 << 22;
    /// The symbol is captured by a closure in a nested function.
    pub const CLOSED_OVER: u32 = 1 << 23;
    /// The symbol is referenced from a nested scope within the same function.
    pub const USED_IN_INNER_SCOPE: u32 = 1 << 24;

    /// The home object binding, used by `super` property accesses.
    pub const SUPER: u32 = 1 << 25;
    /// The `new.target` binding.
    pub const NEW_TARGET: u32 = 1 << 26;
}

/// Stable identity of a [`Symbol`] inside a [`SymbolArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// A symbolic address for a named binding.
///
/// Identifiers in source, as well as synthetic bindings created by the
/// frontend (`this`, `arguments`, function self-references), are represented
/// by `Symbol` values. A symbol is created when a declaration is registered
/// in a scope and stays owned by that scope for the life of the tree. The
/// declaration-kind and attribute bits are fixed at construction; the usage
/// outcome bits (`USED`, `CLOSED_OVER`, `USED_IN_INNER_SCOPE`) and the
/// declared/TDZ bit are flipped in place as resolution progresses.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    flags: u32,
}

impl Symbol {
    /// Creates a symbol. Exactly one declaration-kind bit must be set.
    pub fn new(name: impl Into<String>, flags: u32) -> Self {
        assert!(
            (flags & symbol_flags::KIND_MASK).count_ones() == 1,
            "symbol must have exactly one declaration kind"
        );
        Symbol { name: name.into(), flags }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn is_let(&self) -> bool {
        (self.flags & symbol_flags::LET) != 0
    }

    pub fn is_const(&self) -> bool {
        (self.flags & symbol_flags::CONST) != 0
    }

    pub fn is_var(&self) -> bool {
        (self.flags & symbol_flags::VAR) != 0
    }

    /// Block-scoped symbols are the `let` and `const` bindings.
    pub fn is_block_scoped(&self) -> bool {
        self.is_let() || self.is_const()
    }

    pub fn is_global(&self) -> bool {
        (self.flags & symbol_flags::GLOBAL) != 0
    }

    pub fn is_param(&self) -> bool {
        (self.flags & symbol_flags::PARAMETER) != 0
    }

    pub fn is_this(&self) -> bool {
        (self.flags & symbol_flags::THIS) != 0
    }

    pub fn is_super(&self) -> bool {
        (self.flags & symbol_flags::SUPER) != 0
    }

    pub fn is_new_target(&self) -> bool {
        (self.flags & symbol_flags::NEW_TARGET) != 0
    }

    pub fn is_internal(&self) -> bool {
        (self.flags & symbol_flags::INTERNAL) != 0
    }

    pub fn is_function_self(&self) -> bool {
        (self.flags & symbol_flags::FUNCTION_SELF) != 0
    }

    pub fn is_hoistable_declaration(&self) -> bool {
        (self.flags & symbol_flags::HOISTABLE_DECLARATION) != 0
    }

    pub fn is_program_level(&self) -> bool {
        (self.flags & symbol_flags::PROGRAM_LEVEL) != 0
    }

    /// Whether the declaration has been evaluated yet (TDZ tracking).
    pub fn has_been_declared(&self) -> bool {
        (self.flags & symbol_flags::HAS_BEEN_DECLARED) != 0
    }

    /// Marks the symbol as declared (end of its temporal dead zone).
    pub fn set_has_been_declared(&mut self, declared: bool) {
        if declared {
            self.flags |= symbol_flags::HAS_BEEN_DECLARED;
        } else {
            self.flags &= !symbol_flags::HAS_BEEN_DECLARED;
        }
    }

    pub fn is_hoisted_block_function_declaration(&self) -> bool {
        (self.flags & symbol_flags::HOISTED_BLOCK_FUNCTION) != 0
    }

    /// Marks this symbol as a block function declaration hoisted into the
    /// body scope. Only meaningful for block-scoped symbols.
    pub fn set_hoisted_block_function_declaration(&mut self) {
        debug_assert!(self.is_block_scoped());
        self.flags |= symbol_flags::HOISTED_BLOCK_FUNCTION;
    }

    pub fn is_var_redeclared_here(&self) -> bool {
        (self.flags & symbol_flags::VAR_REDECLARED_HERE) != 0
    }

    pub fn is_declared_in_switch_block(&self) -> bool {
        (self.flags & symbol_flags::DECLARED_IN_SWITCH_BLOCK) != 0
    }

    pub fn is_import_binding(&self) -> bool {
        (self.flags & symbol_flags::IMPORT_BINDING) != 0
    }

    pub fn is_catch_parameter(&self) -> bool {
        (self.flags & symbol_flags::CATCH_PARAMETER) != 0
    }

    pub fn is_block_function_declaration(&self) -> bool {
        (self.flags & symbol_flags::BLOCK_FUNCTION_DECLARATION) != 0
    }

    pub fn is_private_name(&self) -> bool {
        (self.flags & symbol_flags::PRIVATE_NAME) != 0
    }

    pub fn is_private_name_static(&self) -> bool {
        (self.flags & symbol_flags::PRIVATE_NAME_STATIC) != 0
    }

    pub fn is_private_method(&self) -> bool {
        (self.flags & symbol_flags::PRIVATE_NAME_METHOD) != 0
    }

    pub fn is_private_accessor(&self) -> bool {
        (self.flags & symbol_flags::PRIVATE_NAME_ACCESSOR) != 0
    }

    /// A private name that is neither a method nor an accessor is a field.
    pub fn is_private_field(&self) -> bool {
        self.is_private_name() && !self.is_private_method() && !self.is_private_accessor()
    }

    pub fn is_arguments(&self) -> bool {
        (self.flags & symbol_flags::ARGUMENTS) != 0
    }

    pub fn is_used(&self) -> bool {
        (self.flags & symbol_flags::USED) != 0
    }

    pub fn set_used(&mut self) {
        self.flags |= symbol_flags::USED;
    }

    pub fn is_closed_over(&self) -> bool {
        (self.flags & symbol_flags::CLOSED_OVER) != 0
    }

    pub fn set_closed_over(&mut self) {
        self.flags |= symbol_flags::CLOSED_OVER;
    }

    pub fn is_used_in_inner_scope(&self) -> bool {
        (self.flags & symbol_flags::USED_IN_INNER_SCOPE) != 0
    }

    pub fn set_used_in_inner_scope(&mut self) {
        self.flags |= symbol_flags::USED_IN_INNER_SCOPE;
    }
}

impl fmt::Display for Symbol {
    /// Compact rendering for logs: the name plus a one-letter kind code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_let() {
            'L'
        } else if self.is_const() {
            'C'
        } else if self.is_global() {
            'G'
        } else if self.is_param() {
            'P'
        } else {
            'V'
        };
        write!(f, "{} {}", self.name, kind)
    }
}

/// Arena owning every [`Symbol`] created during one parse.
///
/// Symbols need a stable identity so usage-outcome bits can be flipped after
/// creation without touching the owning scope; handing out [`SymbolId`]s into
/// a flat arena gives exactly that.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena { symbols: Vec::with_capacity(jsz_common::limits::SYMBOL_PREALLOC) }
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Name-to-symbol map for one scope.
///
/// Iteration order is declaration order, which is observable downstream
/// (per-scope binding enumeration follows source order).
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: IndexMap<String, SymbolId, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { entries: IndexMap::default() }
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.entries.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn set(&mut self, name: String, id: SymbolId) {
        self.entries.insert(name, id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.entries.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
