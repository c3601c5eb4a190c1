mod subscriber;
mod subscriber_email;

pub use subscriber::{InvalidSubscriberRecord, SUBSCRIBER_SOURCE, Subscriber};
pub use subscriber_email::SubscriberEmail;
