//! Resolution statistics and post-resolution validation.

use std::fmt::Write;

use serde::Serialize;

use crate::{ScopeId, ScopeTree};

/// Snapshot of the resolution outcome across the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub scopes: u64,
    pub symbols: u64,
    pub used_symbols: u64,
    pub closed_over_symbols: u64,
    pub inner_scope_used_symbols: u64,
    pub scopes_with_closures: u64,
    pub scopes_with_eval: u64,
    pub unresolved_names: u64,
}

/// Structural problems found by [`ScopeTree::validate`]. These indicate a
/// bug in the binding client's scope discipline, not a malformed user
/// program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A closed scope still holds a pending reference.
    PendingUseInClosedScope { scope: ScopeId, name: String },
    /// A symbol table entry whose name does not match the arena symbol.
    MismatchedSymbolName { scope: ScopeId, name: String },
}

impl ScopeTree {
    /// Scans the tree and counts the resolution outcomes.
    pub fn resolution_stats(&self) -> ResolutionStats {
        let mut stats = ResolutionStats {
            scopes: self.scopes.len() as u64,
            symbols: self.symbols.len() as u64,
            unresolved_names: self.unresolved.len() as u64,
            ..ResolutionStats::default()
        };
        for symbol in self.symbols.iter() {
            if symbol.is_used() {
                stats.used_symbols += 1;
            }
            if symbol.is_closed_over() {
                stats.closed_over_symbols += 1;
            }
            if symbol.is_used_in_inner_scope() {
                stats.inner_scope_used_symbols += 1;
            }
        }
        for scope in &self.scopes {
            if scope.has_closures() {
                stats.scopes_with_closures += 1;
            }
            if scope.has_eval() {
                stats.scopes_with_eval += 1;
            }
        }
        stats
    }

    /// Human-readable summary of [`resolution_stats`](ScopeTree::resolution_stats).
    pub fn resolution_summary(&self) -> String {
        let stats = self.resolution_stats();
        let mut report = String::new();
        let _ = writeln!(report, "Scope Resolution Summary:");
        let _ = writeln!(report, "- Scopes: {}", stats.scopes);
        let _ = writeln!(
            report,
            "- Symbols: {} ({} used, {} closed over, {} used in inner scopes)",
            stats.symbols,
            stats.used_symbols,
            stats.closed_over_symbols,
            stats.inner_scope_used_symbols
        );
        let _ = writeln!(
            report,
            "- Scopes with closures: {}, with direct eval: {}",
            stats.scopes_with_closures, stats.scopes_with_eval
        );
        let _ = writeln!(report, "- Unresolved names: {}", stats.unresolved_names);
        report
    }

    /// Runs structural validation over the settled tree. Returns every
    /// violation found; an empty list means the binding client kept its
    /// side of the contract.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (index, scope) in self.scopes.iter().enumerate() {
            let id = ScopeId(index as u32);
            if scope.is_closed() && scope.use_count() > 0 {
                if let Some(uses) = &scope.uses {
                    for (name, info) in uses.iter() {
                        if info.is_unresolved() {
                            errors.push(ValidationError::PendingUseInClosedScope {
                                scope: id,
                                name: name.clone(),
                            });
                        }
                    }
                }
            }
            for (name, sym_id) in scope.symbols() {
                match self.symbols.get(sym_id) {
                    Some(symbol) if symbol.name() == name => {}
                    _ => errors.push(ValidationError::MismatchedSymbolName {
                        scope: id,
                        name: name.to_string(),
                    }),
                }
            }
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
