//! Live Link
//!
//! Exclusive ownership of the single push channel. Opening a channel always
//! closes the previous one first, and dropping the link closes whatever is
//! still open.
//!
//! Every channel is stamped with a generation when it is opened. Messages and
//! errors carry the generation of the channel that produced them so late
//! deliveries from a replaced channel can be ignored.

/// A server-push channel that can be closed by its owner
pub trait PushChannel {
    /// Stop receiving events and release the underlying connection
    fn close(&mut self);
}

/// Connection state of the live link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
}

/// Owner of at most one open push channel
pub struct LiveLink<C: PushChannel> {
    handle: Option<C>,
    generation: u64,
}

impl<C: PushChannel> Default for LiveLink<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: PushChannel> LiveLink<C> {
    pub fn new() -> Self {
        Self {
            handle: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        if self.handle.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    /// Generation of the most recent open attempt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `generation` names the channel that is open right now
    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && self.generation == generation
    }

    /// Close any open channel, then open a new one.
    ///
    /// `open` receives the generation the new channel must report with. On
    /// error the link stays disconnected.
    pub fn connect<E>(&mut self, open: impl FnOnce(u64) -> Result<C, E>) -> Result<u64, E> {
        self.release();
        self.generation += 1;
        let generation = self.generation;

        let handle = open(generation)?;
        self.handle = Some(handle);
        tracing::debug!(generation, "push channel opened");

        Ok(generation)
    }

    /// Close the open channel, if any. Returns whether one was open.
    pub fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(mut handle) => {
                handle.close();
                tracing::debug!(generation = self.generation, "push channel closed");
                true
            }
            None => false,
        }
    }

    /// Close the open channel only if it is the one named by `generation`
    pub fn release_if_current(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.release()
        } else {
            false
        }
    }
}

impl<C: PushChannel> Drop for LiveLink<C> {
    fn drop(&mut self) {
        self.release();
    }
}
