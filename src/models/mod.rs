pub mod booking;
pub mod service;

pub use booking::Booking;
pub use service::{Review, Service};
