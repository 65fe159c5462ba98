//! Parse stack
//!
//!     Read as one sequence the stack alternates states and value frames, always starting
//!     and ending with a state: `0, v1, s1, v2, s2, ... vn, sn`. It is stored as two
//!     parallel vectors where `states` is always exactly one longer than `frames`, and
//!     every push or pop moves one state and one frame together.

use crate::yapl::error::ParseError;
use crate::yapl::token::Span;

/// A semantic value and the source it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<V> {
    pub value: V,
    pub span: Option<Span>,
}

#[derive(Debug)]
pub struct ParseStack<V> {
    states: Vec<usize>,
    frames: Vec<Frame<V>>,
}

impl<V> Default for ParseStack<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ParseStack<V> {
    /// A stack holding only the initial state.
    pub fn new() -> Self {
        Self {
            states: vec![0],
            frames: Vec::new(),
        }
    }

    pub fn top(&self) -> usize {
        self.states.last().copied().unwrap_or(0)
    }

    pub fn push(&mut self, frame: Frame<V>, state: usize) {
        self.frames.push(frame);
        self.states.push(state);
    }

    /// Pop `count` (frame, state) pairs, returning the frames in left-to-right order.
    pub fn pop(&mut self, count: usize) -> Result<Vec<Frame<V>>, ParseError> {
        if count > self.frames.len() {
            return Err(ParseError::InvariantViolation(format!(
                "cannot pop {} frames from a stack holding {}",
                count,
                self.frames.len()
            )));
        }
        let keep = self.frames.len() - count;
        self.states.truncate(keep + 1);
        Ok(self.frames.split_off(keep))
    }

    /// True once the stack has collapsed back to the initial state.
    pub fn is_initial(&self) -> bool {
        self.frames.is_empty() && self.states == [0]
    }

    /// Number of value frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: &'static str) -> Frame<&'static str> {
        Frame { value, span: None }
    }

    #[test]
    fn test_pop_keeps_left_to_right_order() {
        let mut stack = ParseStack::new();
        stack.push(frame("a"), 3);
        stack.push(frame("b"), 5);
        stack.push(frame("c"), 8);
        let popped = stack.pop(2).unwrap();
        let values: Vec<_> = popped.iter().map(|f| f.value).collect();
        assert_eq!(values, vec!["b", "c"]);
        assert_eq!(stack.top(), 3);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_nothing_for_epsilon() {
        let mut stack = ParseStack::new();
        stack.push(frame("a"), 4);
        assert!(stack.pop(0).unwrap().is_empty());
        assert_eq!(stack.top(), 4);
    }

    #[test]
    fn test_collapse_to_initial() {
        let mut stack = ParseStack::new();
        assert!(stack.is_initial());
        stack.push(frame("a"), 1);
        assert!(!stack.is_initial());
        stack.pop(1).unwrap();
        assert!(stack.is_initial());
        assert_eq!(stack.top(), 0);
    }

    #[test]
    fn test_over_pop_is_internal() {
        let mut stack: ParseStack<&str> = ParseStack::new();
        assert!(stack.pop(1).unwrap_err().is_internal());
    }
}
