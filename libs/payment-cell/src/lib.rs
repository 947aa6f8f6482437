pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ConfirmPaymentRequest, CreatePaymentRequest, PaymentError, PaymentIntent};
pub use router::payment_routes;
pub use services::confirmation::ConfirmationService;
pub use services::stripe::StripeClient;
