//! Centralized limits and thresholds for the jsz frontend.
//!
//! This module provides shared constants for nesting depths and capacity
//! limits used throughout the codebase. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Makes it easy to tune limits for different environments
//! - Documents the rationale for each limit

// =============================================================================
// Nesting Depth Limits
// =============================================================================
// These prevent stack overflow and runaway parent-chain walks on pathological
// inputs.

/// Maximum depth of the binding-scope tree.
///
/// Every syntactic construct that introduces bindings (function, block, class,
/// catch clause, switch body, ...) opens one scope, so scope depth is bounded
/// by source nesting depth. A parser that enforces its own recursion limit
/// will never come close to this; the scope tree asserts it anyway so that a
/// misbehaving caller fails fast instead of degrading scope-chain walks.
///
/// # JavaScript example
///
/// ```javascript
/// // Each nested block adds one level of scope depth:
/// {{{{{{{{{{{{{{{{{{{{{{{{{
///   let x = 1; // depth 25
/// }}}}}}}}}}}}}}}}}}}}}}}}}
///
/// // Functions nest scopes faster (parameter scope + body scope each):
/// const f = () => () => () => () => 42;
/// ```
pub const MAX_SCOPE_DEPTH: u32 = 10_000;

// =============================================================================
// Capacity Limits
// =============================================================================
// Pre-allocation sizes. These are starting capacities, not hard caps.

/// Pre-allocation size for the scope arena.
///
/// A typical script opens a few dozen scopes; generated code can open
/// thousands. Reserving a modest block up front avoids the first few
/// reallocation steps without wasting memory on small inputs.
pub const SCOPE_PREALLOC: usize = 64;

/// Pre-allocation size for the symbol arena.
///
/// Each declaration (variable, parameter, function name, class name, import,
/// private name, ...) allocates one symbol. Symbol counts track declaration
/// counts, which in real-world sources run several times the scope count.
pub const SYMBOL_PREALLOC: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prealloc_sizes_are_modest() {
        assert!(SCOPE_PREALLOC <= 1024);
        assert!(SYMBOL_PREALLOC <= 4096);
    }

    #[test]
    fn test_scope_depth_limit_fits_u32() {
        assert!(MAX_SCOPE_DEPTH < u32::MAX);
    }
}
