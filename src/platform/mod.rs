//! Presentation layer seam
//!
//! The core never touches the DOM. Adapters read a [`View`] snapshot, turn
//! drained events into text with [`message_for`]/[`popup_for`], and send
//! back [`Intent`](crate::sim::Intent)s.

pub mod messages;
pub mod view;

pub use messages::{Message, Popup, PopupAction, PopupChange, Tone, message_for, popup_for};
pub use view::{ChoiceView, CountdownView, View};
