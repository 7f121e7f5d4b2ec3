//! Explicit call-stack tracking
//!
//! Each logical layer that wants to appear in a record's call stack enters a
//! frame, typically through the [`scope!`](crate::scope) macro. Frames live
//! on a per-thread stack and are popped by the returned [`FrameGuard`].
//!
//! # Example
//!
//! ```
//! use leveled_logger::core::call_stack;
//!
//! fn handle_request() {
//!     let _frame = call_stack::enter("handle_request");
//!     assert_eq!(call_stack::depth(), 1);
//!     assert_eq!(call_stack::current_function().as_deref(), Some("handle_request"));
//! }
//!
//! handle_request();
//! assert_eq!(call_stack::collect(), None);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;
use std::path::Path;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// One entry of the call stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Basename of the source file that entered the frame
    pub file: String,
    /// Line where the frame was entered
    pub line: u32,
    pub function: String,
}

impl Frame {
    #[track_caller]
    fn here(function: String) -> Self {
        let location = Location::caller();
        Self {
            file: basename(location.file()).to_string(),
            line: location.line(),
            function,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]>{}", self.file, self.line, self.function)
    }
}

/// RAII guard for an entered frame
///
/// Dropping the guard pops the frame. Guards are tied to the thread that
/// created them.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| frames.borrow_mut().truncate(self.depth));
    }
}

/// Push a frame for `function`, recorded at the caller's location
#[track_caller]
pub fn enter(function: impl Into<String>) -> FrameGuard {
    let frame = Frame::here(function.into());
    let depth = FRAMES.with(|frames| {
        let mut frames = frames.borrow_mut();
        let depth = frames.len();
        frames.push(frame);
        depth
    });
    FrameGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Render the active frames, outermost first
///
/// Returns `None` when no frame is active, i.e. the caller is at top level.
pub fn collect() -> Option<String> {
    FRAMES.with(|frames| {
        let frames = frames.borrow();
        if frames.is_empty() {
            return None;
        }
        Some(
            frames
                .iter()
                .map(Frame::to_string)
                .collect::<Vec<_>>()
                .join("->"),
        )
    })
}

/// Snapshot of the active frames, outermost first
pub fn frames() -> Vec<Frame> {
    FRAMES.with(|frames| frames.borrow().clone())
}

/// Name of the innermost active frame
pub fn current_function() -> Option<String> {
    FRAMES.with(|frames| frames.borrow().last().map(|frame| frame.function.clone()))
}

pub fn depth() -> usize {
    FRAMES.with(|frames| frames.borrow().len())
}

/// Final path component of a source path
pub fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Strip the helper suffix and closure segments from a `type_name` path
#[doc(hidden)]
pub fn function_name_from_type(type_name: &'static str) -> &'static str {
    let path = type_name.strip_suffix("::__frame_marker").unwrap_or(type_name);
    let path = path.trim_end_matches("::{{closure}}");
    path.rsplit("::").next().unwrap_or(path)
}
