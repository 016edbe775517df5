//! Pending-or-resolved records of free-variable references.

use smallvec::SmallVec;

use crate::ScopeId;

/// One name's reference record within one scope's use table.
///
/// A `UseInfo` is created on the first reference to a name that is not (yet)
/// declared in the referencing scope. It travels upward as scopes close:
/// when a scope cannot resolve the name, the record is merged into the
/// parent's table, with the originating scope accumulated in
/// `inner_use_scopes` so that the eventual resolution (or final
/// unresolvability) can be pushed back down for classification.
#[derive(Debug, Clone)]
pub struct UseInfo {
    name: String,
    /// Scope owning the declaring symbol; `None` until resolved.
    def: Option<ScopeId>,
    /// Scope with a live local reference; `None` once fully forwarded away.
    use_scope: Option<ScopeId>,
    /// Scopes one or more levels below that hold unresolved references to
    /// the same name.
    inner_use_scopes: SmallVec<[ScopeId; 2]>,
}

impl UseInfo {
    pub fn new(name: impl Into<String>) -> Self {
        UseInfo {
            name: name.into(),
            def: None,
            use_scope: None,
            inner_use_scopes: SmallVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn def(&self) -> Option<ScopeId> {
        self.def
    }

    pub fn use_scope(&self) -> Option<ScopeId> {
        self.use_scope
    }

    pub fn inner_use_scopes(&self) -> &[ScopeId] {
        &self.inner_use_scopes
    }

    /// A record is unresolved while it has no definition, or while inner
    /// uses still await classification. A resolved record with no inner
    /// uses has `use_scope == def`.
    pub fn is_unresolved(&self) -> bool {
        self.def.is_none() || !self.inner_use_scopes.is_empty()
    }

    pub(crate) fn set_use_scope(&mut self, scope: ScopeId) {
        self.use_scope = Some(scope);
    }

    pub(crate) fn clear_use_scope(&mut self) {
        self.use_scope = None;
    }

    pub(crate) fn resolve(&mut self, def: ScopeId) {
        self.def = Some(def);
        self.use_scope = Some(def);
    }

    pub(crate) fn clear_def(&mut self) {
        self.def = None;
    }

    pub(crate) fn add_inner_use_scope(&mut self, scope: ScopeId) {
        if !self.inner_use_scopes.contains(&scope) {
            self.inner_use_scopes.push(scope);
        }
    }

    pub(crate) fn take_inner_use_scopes(&mut self) -> SmallVec<[ScopeId; 2]> {
        std::mem::take(&mut self.inner_use_scopes)
    }

    /// Absorbs another scope's record for the same name. The incoming
    /// record's live use (if any) becomes this record's live use; its inner
    /// use scopes are accumulated.
    pub(crate) fn merge_from_inner(&mut self, other: UseInfo) {
        debug_assert_eq!(self.name, other.name);
        if self.use_scope.is_none() {
            self.use_scope = other.use_scope;
        }
        for scope in other.inner_use_scopes {
            self.add_inner_use_scope(scope);
        }
    }
}
