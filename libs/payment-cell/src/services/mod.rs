pub mod confirmation;
pub mod stripe;
