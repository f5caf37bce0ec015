//! Cascading selection: keeps a dependent select control in step with the
//! value of an independent one, fed by an asynchronous lookup.

pub mod alert;
pub mod controller;
pub mod dispatch;
pub mod guard;
pub mod render;
pub mod text;

pub use alert::{Alert, AlertContainer, AlertSink, Severity};
pub use controller::{CascadeController, InitialState, RenderSurface, UiMode};
pub use dispatch::{
    resolve, DispatchError, LookupCompletion, LookupDispatch, LookupTicket, TaskDispatcher,
};
pub use guard::{check_submission, Control, SubmitDecision};
pub use render::{describe, OptionEntry, RenderDescription};
pub use text::CascadeText;
