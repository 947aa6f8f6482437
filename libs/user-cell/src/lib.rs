pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{LoginRequest, NewUser, UserError, UserRecord};
pub use router::user_routes;
pub use services::account::AccountService;
pub use services::avatar::AvatarStore;
