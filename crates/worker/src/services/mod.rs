//! Clients for the services around the sync: the offset queue and the
//! completion email.

pub mod email;
pub mod pubsub;

pub use email::{COMPLETION_SUBJECT, CompletionReport, NotifyError, SendGridNotifier};
pub use pubsub::{PubSubPublisher, PublishError};
