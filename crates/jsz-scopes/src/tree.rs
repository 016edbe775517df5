//! The scope arena: construction factories, declaration registration, and
//! scope-chain queries.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tracing::debug;

use jsz_common::limits;

use crate::scope::{compute_context_flags, scope_flags, Scope};
use crate::symbol::{symbol_flags, Symbol, SymbolArena};
use crate::{ScopeId, SymbolId};

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Arena owning every [`Scope`] of one parse, together with the symbol
/// arena and the table of permanently unresolved references.
///
/// The binding client (the parser) opens scopes through the `create_*`
/// factories while descending into syntactic constructs, registers
/// declarations and identifier references as they are parsed, and settles
/// each scope with [`close`](ScopeTree::close) (or discards a speculative
/// one with [`kill`](ScopeTree::kill)) on the way back out. All cross-scope
/// relations are [`ScopeId`] indexes into this arena, never owning pointers,
/// so parent back-references and def/use links cannot form ownership cycles.
#[derive(Debug, Default)]
pub struct ScopeTree {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) symbols: SymbolArena,
    /// Names that reached the top of their scope chain (or a closed parent)
    /// without a declaration, with every scope that referenced them.
    /// Downstream these are treated as global or dynamically introduced
    /// bindings.
    pub(crate) unresolved: FxIndexMap<String, SmallVec<[ScopeId; 2]>>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: Vec::with_capacity(limits::SCOPE_PREALLOC),
            symbols: SymbolArena::new(),
            unresolved: FxIndexMap::default(),
        }
    }

    fn alloc(&mut self, parent: Option<ScopeId>, kind: u32, flags: u32) -> ScopeId {
        let depth = match parent {
            Some(p) => self.scope(p).depth + 1,
            None => 0,
        };
        assert!(depth <= limits::MAX_SCOPE_DEPTH, "scope nesting too deep");
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(parent, depth, kind, flags));
        id
    }

    /// Context flags a child scope inherits when it does not introduce a new
    /// function context (blocks, catch/class/eval scopes).
    fn inherited_flags(&self, parent: ScopeId) -> u32 {
        self.scope(parent).flags
    }

    // Scope construction factories, one per scope kind.

    pub fn create_global(&mut self) -> ScopeId {
        self.alloc(
            None,
            scope_flags::FUNCTION_BODY | scope_flags::GLOBAL | scope_flags::FUNCTION_TOP,
            0,
        )
    }

    pub fn create_module(&mut self) -> ScopeId {
        self.alloc(
            None,
            scope_flags::FUNCTION_BODY | scope_flags::MODULE | scope_flags::FUNCTION_TOP,
            0,
        )
    }

    /// Opens a function body scope. `function_top` is false only when the
    /// body hangs below a separate parameter scope, which then must be the
    /// parent.
    pub fn create_function_body(
        &mut self,
        parent: ScopeId,
        function_flags: u32,
        function_top: bool,
    ) -> ScopeId {
        assert!(
            function_top
                || (self.scope(parent).is_function_parameter_scope()
                    && self.scope(parent).is_function_top_scope()),
            "non-top function body must hang below its parameter scope"
        );
        let kind =
            scope_flags::FUNCTION_BODY | if function_top { scope_flags::FUNCTION_TOP } else { 0 };
        let flags = compute_context_flags(self.inherited_flags(parent), function_flags);
        self.alloc(Some(parent), kind, flags)
    }

    /// Opens a function parameter scope. With [`function_flags::ARROW`] this
    /// is a speculative cover-grammar scope that must later be either closed
    /// (the arrow was confirmed) or killed (the tokens turned out to be a
    /// parenthesized expression).
    ///
    /// [`function_flags::ARROW`]: crate::function_flags::ARROW
    pub fn create_function_parameter(&mut self, parent: ScopeId, function_flags: u32) -> ScopeId {
        let mut kind = scope_flags::FUNCTION_PARAMETER | scope_flags::FUNCTION_TOP;
        if (function_flags & crate::function_flags::ARROW) != 0 {
            kind |= scope_flags::ARROW_FUNCTION_PARAMETER;
        }
        let flags = compute_context_flags(self.inherited_flags(parent), function_flags);
        self.alloc(Some(parent), kind, flags)
    }

    pub fn create_block(&mut self, parent: ScopeId) -> ScopeId {
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), scope_flags::BLOCK, flags)
    }

    pub fn create_catch_parameter(&mut self, parent: ScopeId) -> ScopeId {
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), scope_flags::CATCH_PARAMETER, flags)
    }

    pub fn create_switch_block(&mut self, parent: ScopeId) -> ScopeId {
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), scope_flags::BLOCK | scope_flags::SWITCH_BLOCK, flags)
    }

    pub fn create_class_head(&mut self, parent: ScopeId) -> ScopeId {
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), scope_flags::BLOCK | scope_flags::CLASS_HEAD, flags)
    }

    pub fn create_class_body(&mut self, parent: ScopeId) -> ScopeId {
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), scope_flags::CLASS_BODY, flags)
    }

    /// Opens the scope of a direct `eval` program. Strict eval gets its own
    /// variable environment; sloppy eval declares `var`s into the caller's.
    pub fn create_eval(&mut self, parent: ScopeId, strict: bool) -> ScopeId {
        let kind = scope_flags::EVAL
            | if strict { scope_flags::FUNCTION_BODY | scope_flags::FUNCTION_TOP } else { 0 };
        let flags = self.inherited_flags(parent);
        self.alloc(Some(parent), kind, flags)
    }

    // Access

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id).expect("symbol id out of range")
    }

    /// Mutable access for the client-owned symbol bits (TDZ tracking,
    /// hoisted-block-function marking).
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.symbols.get_mut(id).expect("symbol id out of range")
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count_total(&self) -> usize {
        self.symbols.len()
    }

    // Declaration registration

    /// Adds a symbol to the scope if no symbol of that name exists yet.
    /// Returns the previously registered symbol otherwise; repeated
    /// equivalent declarations (e.g. a redundant `var`) get the original
    /// back. Registering a conflicting declaration kind for an existing
    /// name is a client error and aborts.
    pub fn put_symbol(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolId> {
        assert!(!self.scope(scope).closed, "scope is closed");
        if let Some(existing) = self.scope(scope).symbols.get(symbol.name()) {
            let existing_flags = self.symbol(existing).flags();
            assert!(
                (existing_flags & symbol_flags::KIND_MASK)
                    == (symbol.flags() & symbol_flags::KIND_MASK),
                "conflicting declaration kind for '{}'",
                symbol.name()
            );
            return Some(existing);
        }
        let block_scoped_or_redeclared = symbol.is_block_scoped() || symbol.is_var_redeclared_here();
        let private = symbol.is_private_name();
        let name = symbol.name().to_string();
        debug!(name = %name, scope = scope.0, flags = symbol.flags(), "declare symbol");
        let id = self.symbols.alloc(symbol);
        let s = self.scope_mut(scope);
        s.symbols.set(name, id);
        if block_scoped_or_redeclared {
            s.has_block_scoped_or_redeclared = true;
        }
        if private {
            s.has_private_names = true;
        }
        None
    }

    /// Registers a declared private name on a class body scope.
    ///
    /// Returns false without mutating if the name is already declared; the
    /// duplicate-private-name error is the caller's to raise.
    pub fn add_private_name(&mut self, scope: ScopeId, name: &str, flags: u32) -> bool {
        assert!(self.scope(scope).is_class_body_scope(), "private names live on class bodies");
        if self.scope(scope).has_symbol(name) {
            debug_assert!(
                self.scope(scope)
                    .get_existing_symbol(name)
                    .is_some_and(|id| self.symbol(id).is_private_name())
            );
            return false;
        }
        self.put_symbol(
            scope,
            Symbol::new(
                name,
                symbol_flags::CONST
                    | symbol_flags::PRIVATE_NAME
                    | symbol_flags::HAS_BEEN_DECLARED
                    | flags,
            ),
        );
        true
    }

    // Scope-chain queries

    /// True if `name` is lexically declared in this scope or any enclosing
    /// scope within the same function.
    ///
    /// With `annex_b`, catch parameters are ignored (B.3.5,
    /// VariableStatements in catch blocks). `include_parameters` extends the
    /// walk through the function body into the parameter scope.
    pub fn is_lexically_declared_name(
        &self,
        scope: ScopeId,
        name: &str,
        annex_b: bool,
        include_parameters: bool,
    ) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(existing) = s.get_existing_symbol(name)
                && self.symbol(existing).is_block_scoped()
            {
                if self.symbol(existing).is_catch_parameter() && annex_b {
                    current = s.parent;
                    continue;
                }
                return true;
            }
            let boundary = if include_parameters {
                s.is_function_top_scope()
            } else {
                s.is_function_body_scope()
            };
            if boundary {
                break;
            }
            current = s.parent;
        }
        false
    }

    /// Returns a block-scoped symbol named `name` declared in this scope or
    /// any enclosing scope within the same function.
    pub fn find_block_scoped_symbol_in_function(
        &self,
        scope: ScopeId,
        name: &str,
    ) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(existing) = s.get_existing_symbol(name) {
                if self.symbol(existing).is_block_scoped() {
                    return Some(existing);
                }
                // a function-scoped symbol shadows anything further out
                break;
            }
            if s.is_function_top_scope() {
                break;
            }
            current = s.parent;
        }
        None
    }

    /// True if `name` is a declared private name visible from this scope.
    pub fn find_private_name(&self, scope: ScopeId, name: &str) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if s.has_symbol(name) {
                return true;
            }
            current = s.parent;
        }
        false
    }

    // Unresolved references

    /// Names that settled as unresolved (potential globals or dynamically
    /// introduced bindings), in the order they settled.
    pub fn unresolved_reference_names(&self) -> impl Iterator<Item = &str> {
        self.unresolved.keys().map(String::as_str)
    }

    pub fn is_unresolved_reference(&self, name: &str) -> bool {
        self.unresolved.contains_key(name)
    }

    /// The scopes that referenced a permanently unresolved name.
    pub fn unresolved_reference_scopes(&self, name: &str) -> &[ScopeId] {
        match self.unresolved.get(name) {
            Some(scopes) => scopes.as_slice(),
            None => &[],
        }
    }
}
