pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{BlockedDate, Booking, BookingError, BookingStatus, PaymentStatus};
pub use router::booking_routes;
pub use services::availability::{slot_catalog, AvailabilityService};
pub use services::blocked_dates::BlockedDateService;
pub use services::lifecycle::BookingService;
