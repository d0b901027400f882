use crate::model::MovieSummary;

/// Visibility primitive: watch one rendered element, report when it is shown.
///
/// A handle must be released before the next one is requested.
pub trait Viewport {
    type Handle;
    fn observe(&mut self, target: &str) -> Self::Handle;
    fn release(&mut self, handle: Self::Handle);
}

/// The paginated thing an [`InfiniteScrollTrigger`] advances.
pub trait PageSource {
    fn is_loading(&self) -> bool;
    fn is_exhausted(&self) -> bool;
    /// Returns whether a fetch was issued.
    fn request_next_page(&mut self) -> bool;
}

struct Observation<H> {
    target: String,
    handle: H,
}

/// Watches the last rendered result and asks for the next page when it becomes visible.
///
/// At most one observation handle is alive at a time; it is released when the
/// last item changes, on [`disconnect`](Self::disconnect), and on drop.
pub struct InfiniteScrollTrigger<V: Viewport> {
    viewport: V,
    observed: Option<Observation<V::Handle>>,
}

impl<V: Viewport> InfiniteScrollTrigger<V> {
    pub fn new(viewport: V) -> Self {
        Self { viewport, observed: None }
    }

    /// Call after every render of `items`. Moves the observation to the new last item if it changed.
    pub fn sync(&mut self, items: &[MovieSummary]) {
        let last = items.last().map(|m| m.id.as_str());
        if self.observed.as_ref().map(|o| o.target.as_str()) == last {
            return;
        }
        self.disconnect();
        if let Some(target) = last {
            let handle = self.viewport.observe(target);
            tracing::trace!(item = target, "observing last item");
            self.observed = Some(Observation { target: target.to_string(), handle });
        }
    }

    /// Visibility callback. Returns whether a next page was requested.
    pub fn on_visible<P: PageSource>(&mut self, target: &str, source: &mut P) -> bool {
        if self.observed().is_some_and(|t| t == target) && !source.is_loading() && !source.is_exhausted() {
            return source.request_next_page();
        }
        false
    }

    pub fn observed(&self) -> Option<&str> {
        self.observed.as_ref().map(|o| o.target.as_str())
    }

    pub fn disconnect(&mut self) {
        if let Some(o) = self.observed.take() {
            self.viewport.release(o.handle);
        }
    }

    pub fn viewport(&self) -> &V { &self.viewport }
}

impl<V: Viewport> Drop for InfiniteScrollTrigger<V> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct LoadMoreHandle(u64);

/// Viewport for non-graphical front ends: the observed item counts as visible
/// whenever the user asks for more.
#[derive(Debug, Default)]
pub struct LoadMoreViewport {
    current: Option<(u64, String)>,
    next_handle: u64,
}

impl LoadMoreViewport {
    pub fn new() -> Self { Self::default() }

    /// The item a "load more" command reveals.
    pub fn visible_target(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, t)| t.as_str())
    }
}

impl Viewport for LoadMoreViewport {
    type Handle = LoadMoreHandle;

    fn observe(&mut self, target: &str) -> LoadMoreHandle {
        self.next_handle += 1;
        self.current = Some((self.next_handle, target.to_string()));
        LoadMoreHandle(self.next_handle)
    }

    fn release(&mut self, handle: LoadMoreHandle) {
        if self.current.as_ref().is_some_and(|(id, _)| *id == handle.0) {
            self.current = None;
        }
    }
}
