pub mod availability;
pub mod blocked_dates;
pub mod lifecycle;
pub mod sweeper;
