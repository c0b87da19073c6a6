//! Trigger dispatch with write-back suppression.
//!
//! ```text
//! trigger ──► guard free? ──no──► suppressed
//!                 │yes
//!                 ▼
//!       handler.handle(state)  ──► [Effect]
//!                 │
//!                 ▼
//!       host.set_field(..) ──► echoed triggers ──► dispatch (guard held: suppressed)
//!       host.refresh_field(..)
//!                 │
//!                 ▼
//!            guard released
//! ```
//!
//! Everything is synchronous. Deferred triggers (the debounced entry-type
//! change) are queued with a due time and flushed by [`Dispatcher::poll`];
//! the caller supplies `now`, so tests control the clock.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

use crate::{Effect, Event, EventHandler, FormHost, ReentrancyGuard};

/// What one dispatch (or poll) did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handler passes that ran to completion.
    pub passes: usize,
    /// Field writes applied through the host.
    pub applied: usize,
    /// Re-render signals sent to the host.
    pub refreshed: usize,
    /// Triggers dropped because a pass was already running.
    pub suppressed: usize,
}

impl AddAssign for DispatchReport {
    fn add_assign(&mut self, rhs: Self) {
        self.passes += rhs.passes;
        self.applied += rhs.applied;
        self.refreshed += rhs.refreshed;
        self.suppressed += rhs.suppressed;
    }
}

#[derive(Debug)]
struct Deferred<E> {
    due: Instant,
    event: E,
}

/// Owns one form's guard and deferred-trigger queue.
#[derive(Debug)]
pub struct Dispatcher<H>
where
    H: EventHandler,
{
    handler: H,
    guard: ReentrancyGuard,
    deferred: RefCell<VecDeque<Deferred<H::Event>>>,
}

impl<H> Dispatcher<H>
where
    H: EventHandler,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            guard: ReentrancyGuard::new(),
            deferred: RefCell::new(VecDeque::new()),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Run one trigger to completion.
    pub fn dispatch<F>(
        &self,
        state: &mut H::State,
        host: &mut F,
        event: &H::Event,
    ) -> DispatchReport
    where
        F: FormHost<H::State, Event = H::Event>,
    {
        let mut report = DispatchReport::default();
        self.run(state, host, event, &mut report);
        report
    }

    fn run<F>(
        &self,
        state: &mut H::State,
        host: &mut F,
        event: &H::Event,
        report: &mut DispatchReport,
    ) where
        F: FormHost<H::State, Event = H::Event>,
    {
        let Some(_scope) = self.guard.try_enter() else {
            report.suppressed += 1;
            tracing::trace!(event = event.event_type(), "pass in progress, trigger suppressed");
            return;
        };

        let effects = self.handler.handle(state, event);
        for effect in effects {
            match effect {
                Effect::SetField(update) => {
                    let echoes = host.set_field(state, &update);
                    report.applied += 1;
                    tracing::debug!(
                        doctype = %update.doctype,
                        row = %update.name,
                        field = %update.field,
                        value = %update.value,
                        "field written"
                    );
                    for echo in &echoes {
                        self.run(state, host, echo, report);
                    }
                }
                Effect::Refresh { field } => {
                    host.refresh_field(state, &field);
                    report.refreshed += 1;
                }
            }
        }

        report.passes += 1;
    }

    /// Queue a trigger to be dispatched once `delay` has elapsed after `now`.
    pub fn dispatch_after(&self, event: H::Event, delay: Duration, now: Instant) {
        tracing::trace!(event = event.event_type(), ?delay, "trigger deferred");
        self.deferred.borrow_mut().push_back(Deferred {
            due: now + delay,
            event,
        });
    }

    /// Number of deferred triggers still waiting.
    pub fn pending(&self) -> usize {
        self.deferred.borrow().len()
    }

    /// Dispatch every deferred trigger due at `now`, earliest first.
    ///
    /// Triggers with equal due times keep their queue order.
    pub fn poll<F>(&self, state: &mut H::State, host: &mut F, now: Instant) -> DispatchReport
    where
        F: FormHost<H::State, Event = H::Event>,
    {
        let mut due: Vec<Deferred<H::Event>> = Vec::new();
        {
            let mut queue = self.deferred.borrow_mut();
            let mut waiting = VecDeque::with_capacity(queue.len());
            while let Some(item) = queue.pop_front() {
                if item.due <= now {
                    due.push(item);
                } else {
                    waiting.push_back(item);
                }
            }
            *queue = waiting;
        }
        due.sort_by_key(|d| d.due);

        let mut report = DispatchReport::default();
        for item in &due {
            report += self.dispatch(state, host, &item.event);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldUpdate;
    use serde_json::json;
    use tallyerp_core::RowId;

    /// Toy form: a single counter row. Every edit asks to bump the counter,
    /// and every write echoes an "edited" trigger, like a bound change handler.
    #[derive(Debug, Clone, PartialEq)]
    enum Trigger {
        Edited,
        Tick(u32),
    }

    impl Event for Trigger {
        fn event_type(&self) -> &'static str {
            match self {
                Trigger::Edited => "counter.edited",
                Trigger::Tick(_) => "counter.tick",
            }
        }
    }

    struct Counter {
        row: RowId,
        value: i64,
        seen: Vec<Trigger>,
    }

    struct Bump;

    impl EventHandler for Bump {
        type State = Counter;
        type Event = Trigger;

        fn handle(&self, state: &Counter, _event: &Trigger) -> Vec<Effect> {
            vec![
                Effect::SetField(FieldUpdate::new(
                    "Counter Row",
                    state.row,
                    "value",
                    json!(state.value + 1),
                )),
                Effect::refresh("rows"),
            ]
        }
    }

    #[derive(Default)]
    struct EchoHost {
        writes: usize,
        refreshes: Vec<String>,
    }

    impl FormHost<Counter> for EchoHost {
        type Event = Trigger;

        fn set_field(&mut self, state: &mut Counter, update: &FieldUpdate) -> Vec<Trigger> {
            self.writes += 1;
            state.value = update.value.as_i64().unwrap();
            vec![Trigger::Edited]
        }

        fn refresh_field(&mut self, _state: &Counter, field: &str) {
            self.refreshes.push(field.to_string());
        }
    }

    struct Recorder;

    impl EventHandler for Recorder {
        type State = Counter;
        type Event = Trigger;

        fn handle(&self, _state: &Counter, _event: &Trigger) -> Vec<Effect> {
            Vec::new()
        }
    }

    fn counter() -> Counter {
        Counter {
            row: RowId::new(),
            value: 0,
            seen: Vec::new(),
        }
    }

    #[test]
    fn echoed_write_does_not_recurse() {
        let dispatcher = Dispatcher::new(Bump);
        let mut state = counter();
        let mut host = EchoHost::default();

        let report = dispatcher.dispatch(&mut state, &mut host, &Trigger::Edited);

        assert_eq!(state.value, 1);
        assert_eq!(host.writes, 1);
        assert_eq!(host.refreshes, vec!["rows".to_string()]);
        assert_eq!(
            report,
            DispatchReport {
                passes: 1,
                applied: 1,
                refreshed: 1,
                suppressed: 1,
            }
        );
        assert!(!dispatcher.guard().is_active());
    }

    #[test]
    fn independent_triggers_each_get_a_pass() {
        let dispatcher = Dispatcher::new(Bump);
        let mut state = counter();
        let mut host = EchoHost::default();

        dispatcher.dispatch(&mut state, &mut host, &Trigger::Edited);
        dispatcher.dispatch(&mut state, &mut host, &Trigger::Edited);

        assert_eq!(state.value, 2);
    }

    #[test]
    fn deferred_triggers_wait_for_their_due_time() {
        let dispatcher = Dispatcher::new(Bump);
        let mut state = counter();
        let mut host = EchoHost::default();
        let t0 = Instant::now();

        dispatcher.dispatch_after(Trigger::Edited, Duration::from_millis(10), t0);
        assert_eq!(dispatcher.pending(), 1);

        let early = dispatcher.poll(&mut state, &mut host, t0 + Duration::from_millis(5));
        assert_eq!(early, DispatchReport::default());
        assert_eq!(state.value, 0);

        let due = dispatcher.poll(&mut state, &mut host, t0 + Duration::from_millis(10));
        assert_eq!(due.passes, 1);
        assert_eq!(state.value, 1);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn poll_runs_due_triggers_earliest_first() {
        struct Log;

        impl EventHandler for Log {
            type State = Counter;
            type Event = Trigger;

            fn handle(&self, _state: &Counter, event: &Trigger) -> Vec<Effect> {
                // Encode the tick in the write so the host can log the order.
                match event {
                    Trigger::Tick(n) => vec![Effect::SetField(FieldUpdate::new(
                        "Counter Row",
                        RowId::new(),
                        "tick",
                        json!(n),
                    ))],
                    Trigger::Edited => Vec::new(),
                }
            }
        }

        struct OrderHost;

        impl FormHost<Counter> for OrderHost {
            type Event = Trigger;

            fn set_field(&mut self, state: &mut Counter, update: &FieldUpdate) -> Vec<Trigger> {
                state
                    .seen
                    .push(Trigger::Tick(update.value.as_u64().unwrap() as u32));
                Vec::new()
            }

            fn refresh_field(&mut self, _state: &Counter, _field: &str) {}
        }

        let dispatcher = Dispatcher::new(Log);
        let mut state = counter();
        let t0 = Instant::now();

        dispatcher.dispatch_after(Trigger::Tick(1), Duration::from_millis(20), t0);
        dispatcher.dispatch_after(Trigger::Tick(2), Duration::from_millis(10), t0);
        dispatcher.dispatch_after(Trigger::Tick(3), Duration::from_millis(10), t0);

        dispatcher.poll(&mut state, &mut OrderHost, t0 + Duration::from_millis(30));

        assert_eq!(
            state.seen,
            vec![Trigger::Tick(2), Trigger::Tick(3), Trigger::Tick(1)]
        );
    }

    #[test]
    fn handler_without_effects_still_completes_a_pass() {
        let dispatcher = Dispatcher::new(Recorder);
        let mut state = counter();
        let mut host = EchoHost::default();

        let report = dispatcher.dispatch(&mut state, &mut host, &Trigger::Edited);

        assert_eq!(report.passes, 1);
        assert_eq!(report.applied, 0);
        assert_eq!(host.writes, 0);
    }
}
