use crate::context::Context;
use crate::types::Value;

/// Position of the element being processed by an array operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFrame {
    pub index: usize,
    pub length: usize,
}

/// The execution context passed to every operation.
///
/// Wraps the caller's [`Context`] with the values the evaluator itself
/// introduces: `root`, fixed by the outermost call, and the `array` frame,
/// present only inside array iteration. It is `Copy`, so entering a scope
/// derives a new one and leaves the enclosing scope untouched.
#[derive(Debug, Clone, Copy)]
pub struct EvalCtx<'a> {
    pub context: &'a Context,
    pub root: &'a Value,
    pub array: Option<ArrayFrame>,
}

impl<'a> EvalCtx<'a> {
    pub fn new(context: &'a Context, root: &'a Value) -> Self {
        EvalCtx {
            context,
            root,
            array: None,
        }
    }

    /// A scope for element `index` of an array of `length` elements.
    pub fn with_array(self, index: usize, length: usize) -> Self {
        EvalCtx {
            array: Some(ArrayFrame { index, length }),
            ..self
        }
    }

    /// `history[index]`, or undefined when out of range.
    pub fn history(&self, index: i64) -> Value {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.context.history.get(i))
            .cloned()
            .unwrap_or_default()
    }
}
