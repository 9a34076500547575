//! Home services marketplace API: CRUD over service listings and
//! bookings stored in MongoDB, with embedded per-service reviews.

pub mod config;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
