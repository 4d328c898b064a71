use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a single registration.
///
/// Ids are unique per emitter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Shareable listener handle.
///
/// Equality is reference identity: clones of one handle compare equal, while
/// handles built from two separate closures never do, even if the closures
/// are textually identical. Keep a clone around to unregister it later.
///
/// # Example
/// ```rust
/// use herald_events::Listener;
///
/// let a = Listener::new(|n: &u32| assert!(*n > 0));
/// let b = a.clone();
/// let c = Listener::new(|n: &u32| assert!(*n > 0));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub struct Listener<P: ?Sized> {
    callback: Arc<dyn Fn(&P) + Send + Sync>,
}

impl<P: ?Sized> Listener<P> {
    /// Wraps a callback into a new, distinct handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self { callback: Arc::new(callback) }
    }

    /// Invokes the callback with `payload`.
    #[inline]
    pub fn call(&self, payload: &P) {
        (self.callback)(payload);
    }

    /// Address of the shared callback; stable for as long as any clone lives.
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.callback).cast::<()>() as usize
    }
}

impl<P: ?Sized> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self { callback: Arc::clone(&self.callback) }
    }
}

impl<P: ?Sized> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<P: ?Sized> Eq for Listener<P> {}

impl<P: ?Sized> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("payload", &std::any::type_name::<P>())
            .field("identity", &format_args!("{:#x}", self.identity()))
            .finish()
    }
}
