use tokio::sync::watch;

/// Observable state container
///
/// Mutations go through the underlying `watch` sender, so every subscriber
/// sees the latest snapshot and each update is applied atomically.
#[derive(Debug)]
pub struct Observable<S> {
    tx: watch::Sender<S>,
}

impl<S> Observable<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Clone the current snapshot
    pub fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Read part of the current snapshot without cloning all of it
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Apply `f`, notifying subscribers only if the state actually changed
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S> Default for Observable<S>
where
    S: Clone + Default + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}
