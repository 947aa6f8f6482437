pub mod mailer;
pub mod templates;

pub use mailer::{BookingEmail, Mailer, NotificationError};
