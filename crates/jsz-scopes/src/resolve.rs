//! Deferred free-variable resolution: reference recording, upward
//! propagation at scope close, speculative-scope abort, and eval taint.
//!
//! Resolution is deferred to scope close on purpose: a reference recorded
//! anywhere in a scope's body must observe every declaration registered in
//! that scope, including hoisted `var` and function declarations that appear
//! textually after it.

use tracing::{debug, warn};

use crate::use_info::UseInfo;
use crate::{ScopeId, ScopeTree, SymbolId};

impl ScopeTree {
    /// Records a free-variable reference originating in `scope`.
    ///
    /// If the scope already owns a matching symbol, the reference resolves
    /// right away, settling any uses previously collected from inner scopes.
    /// Otherwise the reference stays pending in this scope's use table until
    /// a later declaration, [`close`](ScopeTree::close), or
    /// [`kill`](ScopeTree::kill) decides its fate.
    ///
    /// In a speculative arrow-parameter scope, references stay pending even
    /// when a matching parameter exists: the declaration is provisional
    /// until the cover grammar commits, and resolving against it would let a
    /// later `kill` discard already-settled classification work. Commit
    /// (`close`) resolves them identically.
    pub fn add_identifier_reference(&mut self, scope: ScopeId, name: &str) {
        assert!(!self.scope(scope).is_closed(), "scope is closed");
        let existing = self.scope(scope).get_existing_symbol(name);
        if let Some(sym_id) = existing
            && !self.scope(scope).is_killable()
        {
            let pending = self.scope_mut(scope).uses.as_mut().and_then(|uses| uses.swap_remove(name));
            let mut info = pending.unwrap_or_else(|| UseInfo::new(name));
            if info.is_unresolved() {
                self.resolve_use_record(scope, sym_id, &mut info);
            }
            self.scope_mut(scope).uses_mut().insert(name.to_string(), info);
        } else {
            debug!(name = %name, scope = scope.0, "reference pending");
            let uses = self.scope_mut(scope).uses_mut();
            let info = uses.entry(name.to_string()).or_insert_with(|| UseInfo::new(name));
            info.set_use_scope(scope);
        }
    }

    /// Closes the scope: no further declarations are permitted, and every
    /// still-pending reference is either resolved against a declaration
    /// this scope gained since the reference was recorded, forwarded to the
    /// parent, or settled as permanently unresolvable. Idempotent.
    pub fn close(&mut self, scope: ScopeId) {
        if self.scope(scope).is_closed() {
            return;
        }
        self.resolve_uses(scope);
        self.scope_mut(scope).closed = true;
        debug!(scope = scope.0, "scope closed");
    }

    /// Discards a speculative arrow-parameter scope whose tokens turned out
    /// to be a parenthesized expression. The provisional parameter
    /// declarations are dropped; every reference the scope held is forwarded
    /// to the parent unresolved. The scope's own live uses become live uses
    /// of the parent, because that is the scope the reference text belongs
    /// to once the cover grammar collapses.
    pub fn kill(&mut self, scope: ScopeId) {
        assert!(!self.scope(scope).is_closed(), "cannot kill a closed scope");
        assert!(
            self.scope(scope).is_arrow_function_parameter_scope(),
            "scope is not killable"
        );
        let parent = self.scope(scope).parent.expect("killable scope has a parent");
        debug!(scope = scope.0, parent = parent.0, "killing speculative scope");
        let s = self.scope_mut(scope);
        s.symbols.clear();
        s.has_block_scoped_or_redeclared = false;
        s.has_private_names = false;
        if let Some(uses) = self.scope_mut(scope).uses.take() {
            for (_, mut info) in (*uses).into_iter() {
                debug_assert!(info.def().is_none());
                if info.use_scope() == Some(scope) {
                    info.set_use_scope(parent);
                }
                self.add_uses_from_inner_scope(parent, info);
            }
        }
        let s = self.scope_mut(scope);
        s.closed = true;
        s.killed = true;
    }

    /// Marks the scope as containing a direct `eval` call and taints every
    /// open ancestor with `has_nested_eval`. The walk stops at the first
    /// closed or already-tainted ancestor: a closed scope cannot be
    /// retroactively poisoned, and a tainted one already propagated
    /// upwards. Idempotent.
    pub fn set_has_eval(&mut self, scope: ScopeId) {
        if self.scope(scope).has_eval {
            return;
        }
        assert!(!self.scope(scope).is_closed(), "scope is closed");
        self.scope_mut(scope).has_eval = true;
        debug!(scope = scope.0, "direct eval call; tainting open ancestors");
        let mut current = self.scope(scope).parent;
        while let Some(id) = current {
            let s = self.scope_mut(id);
            if s.closed || s.has_nested_eval {
                break;
            }
            s.has_nested_eval = true;
            current = s.parent;
        }
    }

    /// Settles every reference still pending in the scope's use table.
    fn resolve_uses(&mut self, scope: ScopeId) {
        let Some(uses) = self.scope_mut(scope).uses.take() else {
            return;
        };
        for (name, mut info) in (*uses).into_iter() {
            if !info.is_unresolved() {
                // settled at reference time; the outcome lives on the symbol
                continue;
            }
            if let Some(sym_id) = self.scope(scope).get_existing_symbol(&name) {
                // a declaration arrived after the reference (hoisted var or
                // function name), or this scope's parameters just committed
                self.resolve_use_record(scope, sym_id, &mut info);
            } else {
                match self.scope(scope).parent {
                    Some(parent) if !self.scope(parent).is_closed() => {
                        if info.use_scope() == Some(scope) {
                            info.clear_use_scope();
                            info.add_inner_use_scope(scope);
                        }
                        self.add_uses_from_inner_scope(parent, info);
                    }
                    Some(_) => {
                        // hard boundary: the enclosing chunk was compiled
                        // and closed separately and cannot learn new uses
                        warn!(name = %name, scope = scope.0, "parent already closed; use severed");
                        self.record_unresolvable(scope, &info);
                    }
                    None => self.record_unresolvable(scope, &info),
                }
            }
        }
    }

    /// Merges an inner scope's unresolved record into this scope.
    ///
    /// If this scope declares the name and is not itself speculative, the
    /// record resolves immediately and resolution is propagated into every
    /// scope it accumulated. Otherwise the record merges into this scope's
    /// own entry for the name, so resolution (or final unresolvability) can
    /// be pushed back down later.
    pub(crate) fn add_uses_from_inner_scope(&mut self, scope: ScopeId, mut info: UseInfo) {
        debug_assert!(!self.scope(scope).is_closed());
        let existing = self.scope(scope).get_existing_symbol(info.name());
        if let Some(sym_id) = existing
            && !self.scope(scope).is_killable()
        {
            self.resolve_use_record(scope, sym_id, &mut info);
        } else {
            let key = info.name().to_string();
            debug!(name = %key, scope = scope.0, "inner use forwarded");
            match self.scope_mut(scope).uses_mut().entry(key) {
                indexmap::map::Entry::Occupied(mut e) => e.get_mut().merge_from_inner(info),
                indexmap::map::Entry::Vacant(e) => {
                    e.insert(info);
                }
            }
        }
    }

    /// Resolves a record against the symbol declared in `def`, classifying
    /// every use scope it accumulated along the way.
    fn resolve_use_record(&mut self, def: ScopeId, sym_id: SymbolId, info: &mut UseInfo) {
        self.symbol_mut(sym_id).set_used();
        if let Some(use_scope) = info.use_scope() {
            self.classify_resolved_use(def, sym_id, use_scope);
        }
        for inner in info.take_inner_use_scopes() {
            self.classify_resolved_use(def, sym_id, inner);
        }
        info.resolve(def);
        debug!(name = info.name(), def = def.0, "reference resolved");
    }

    /// Classifies one resolved use: a reference that crosses a function
    /// boundary on its way up to the declaring scope captures the binding
    /// (it must outlive the declaring activation), while a reference from a
    /// nested block within the same function only widens the binding's
    /// visibility.
    fn classify_resolved_use(&mut self, def: ScopeId, sym_id: SymbolId, use_scope: ScopeId) {
        if use_scope == def {
            return;
        }
        if self.crosses_function_boundary(use_scope, def) {
            self.symbol_mut(sym_id).set_closed_over();
            self.scope_mut(def).has_closures = true;
            debug!(name = %self.symbol(sym_id).name(), def = def.0, use_scope = use_scope.0, "closed over");
        } else {
            self.symbol_mut(sym_id).set_used_in_inner_scope();
        }
    }

    /// Whether any scope on the walk from `from` up to (excluding) `to` is
    /// a function-top scope. Killed scopes no longer delimit a function;
    /// their former contents belong to the parent's construct.
    fn crosses_function_boundary(&self, from: ScopeId, to: ScopeId) -> bool {
        let mut current = from;
        while current != to {
            let s = self.scope(current);
            if s.is_function_top_scope() && !s.killed {
                return true;
            }
            current = s.parent.expect("use scope must be below its defining scope");
        }
        false
    }

    /// Settles a record as permanently unresolvable: the top of the scope
    /// chain was reached, or the parent already closed (a hard boundary
    /// such as a separately compiled `eval` chunk). Every scope the record
    /// accumulated is severed the same way.
    fn record_unresolvable(&mut self, scope: ScopeId, info: &UseInfo) {
        debug!(name = info.name(), scope = scope.0, "reference unresolvable; treated as global");
        let entry = self.unresolved.entry(info.name().to_string()).or_default();
        if let Some(use_scope) = info.use_scope()
            && !entry.contains(&use_scope)
        {
            entry.push(use_scope);
        }
        for &inner in info.inner_use_scopes() {
            if !entry.contains(&inner) {
                entry.push(inner);
            }
        }
    }
}
