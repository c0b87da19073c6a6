//! Form-event mechanics (domain-agnostic).
//!
//! A host form fires triggers (field edited, row added/removed). Handlers turn
//! a trigger into [`Effect`]s; the [`Dispatcher`] applies them through a
//! [`FormHost`] and suppresses the triggers its own writes echo back.

pub mod dispatcher;
pub mod effect;
pub mod event;
pub mod guard;
pub mod handler;
pub mod host;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use effect::{Effect, FieldUpdate};
pub use event::Event;
pub use guard::{GuardScope, ReentrancyGuard};
pub use handler::EventHandler;
pub use host::FormHost;
