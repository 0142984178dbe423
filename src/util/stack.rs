/// Runs `f`, first moving to a fresh stack segment if less than the red zone
/// remains on the current one.
///
/// Wraps the recursive entry points of the parser and the evaluator, so
/// deeply nested source and deep call chains are limited by
/// [`MAX_CALL_DEPTH`](crate::interpreter::evaluator::core::MAX_CALL_DEPTH)
/// rather than by the host thread's stack size.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: usize) -> usize {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { 1 + nest(depth - 1) })
    }

    #[test]
    fn deep_recursion_grows_the_stack() {
        assert_eq!(nest(100_000), 100_000);
    }
}
