//! Randomized depth-first walk with explicit-stack backtracking.
//!
//! The maze backtracker and the room-merge search share this shape: advance
//! from the top of the stack to a randomly chosen next node, or pop and retry
//! from the previous node when the current one is exhausted.

/// Walks from `start` until the stack unwinds completely. `advance` inspects
/// the node on top of the stack and either commits a step to a next node and
/// returns it, or returns `None` to backtrack.
pub(super) fn randomized_spanning_walk<N, F>(start: N, mut advance: F)
where
    N: Copy,
    F: FnMut(N) -> Option<N>,
{
    let mut stack = vec![start];
    while let Some(&top) = stack.last() {
        match advance(top) {
            Some(next) => stack.push(next),
            None => {
                stack.pop();
            }
        }
    }
}
