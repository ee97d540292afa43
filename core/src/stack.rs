//! Stack growth for the recursive passes.
//!
//! Lowering, evaluation and rendering all recurse once per tree level, and a
//! long operator chain is as deep as it is long. Each recursive entry point
//! runs through [`ensure_sufficient_stack`], which moves onto a fresh stack
//! segment when the current one runs low.

/// Grow the stack when less than this much remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
