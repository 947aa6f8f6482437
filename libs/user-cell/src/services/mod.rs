pub mod account;
pub mod avatar;
