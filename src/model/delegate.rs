//! Optional observer hooks around each highlight pass

use std::ops::Range;

/// Observer notified before and after ranges are highlighted.
///
/// Both hooks are optional; the defaults express "no opinion".
pub trait HighlightDelegate {
    /// Asked before a job is dispatched. `Some(false)` skips the range;
    /// `None` and `Some(true)` let it through.
    fn should_highlight(&mut self, _range: &Range<usize>) -> Option<bool> {
        None
    }

    /// Told when a dispatched job was applied (`true`) or rejected as stale (`false`).
    /// Not called for vetoed ranges or engine failures.
    fn did_highlight(&mut self, _range: Range<usize>, _success: bool) {}
}

type ShouldHighlightFn = Box<dyn FnMut(&Range<usize>) -> bool>;
type DidHighlightFn = Box<dyn FnMut(Range<usize>, bool)>;

/// Delegate built from two independently optional closures
#[derive(Default)]
pub struct CallbackDelegate {
    should_highlight: Option<ShouldHighlightFn>,
    did_highlight: Option<DidHighlightFn>,
}

impl CallbackDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_should_highlight(mut self, f: impl FnMut(&Range<usize>) -> bool + 'static) -> Self {
        self.should_highlight = Some(Box::new(f));
        self
    }

    pub fn on_did_highlight(mut self, f: impl FnMut(Range<usize>, bool) + 'static) -> Self {
        self.did_highlight = Some(Box::new(f));
        self
    }
}

impl HighlightDelegate for CallbackDelegate {
    fn should_highlight(&mut self, range: &Range<usize>) -> Option<bool> {
        self.should_highlight.as_mut().map(|f| f(range))
    }

    fn did_highlight(&mut self, range: Range<usize>, success: bool) {
        if let Some(f) = self.did_highlight.as_mut() {
            f(range, success);
        }
    }
}

impl std::fmt::Debug for CallbackDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDelegate")
            .field("should_highlight", &self.should_highlight.is_some())
            .field("did_highlight", &self.did_highlight.is_some())
            .finish()
    }
}
