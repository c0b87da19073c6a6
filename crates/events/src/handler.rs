use crate::{Effect, Event};

/// Turns a trigger into effects (pure decision logic).
///
/// Handlers read the current form state and return what should change; they
/// never write. Writing is the dispatcher's job, which is what lets it break
/// the write → trigger → write cycle.
pub trait EventHandler {
    type State;
    type Event: Event;

    fn handle(&self, state: &Self::State, event: &Self::Event) -> Vec<Effect>;
}
