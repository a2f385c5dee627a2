//! Viewport scroll control port.

/// Enables or disables scrolling of the list viewport.
///
/// The controller disables scrolling when a drag starts and re-enables it on
/// every exit path: commit, cancel and drop of the controller itself.
pub trait ScrollLock {
    fn set_scroll_enabled(&self, enabled: bool);
}

impl<T: ScrollLock + ?Sized> ScrollLock for &T {
    fn set_scroll_enabled(&self, enabled: bool) {
        (**self).set_scroll_enabled(enabled)
    }
}

/// Viewport that needs no scroll handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScrollLock;

impl ScrollLock for NoScrollLock {
    fn set_scroll_enabled(&self, _enabled: bool) {}
}
