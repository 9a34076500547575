pub mod database;

pub use database::MarketplaceDb;
