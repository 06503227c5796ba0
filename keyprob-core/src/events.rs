use crate::error::ModelResult;
use crate::keys::KeyEvent;

/// A serial stream of key events feeding a `KeypressModel`.
///
/// Sources are pulled one event at a time; each event is fully processed
/// before the next one is requested. Returning `Ok(None)` ends the session.
pub trait KeyEventSource {
	fn next_event(&mut self) -> ModelResult<Option<KeyEvent>>;
}

/// Adapts any iterator of events into a `KeyEventSource`.
///
/// Useful for replaying recorded sessions and in tests.
pub struct IterSource<I> {
	events: I,
}

impl<I: Iterator<Item = KeyEvent>> IterSource<I> {
	pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
		Self { events: events.into_iter() }
	}
}

impl<I: Iterator<Item = KeyEvent>> KeyEventSource for IterSource<I> {
	fn next_event(&mut self) -> ModelResult<Option<KeyEvent>> {
		Ok(self.events.next())
	}
}
