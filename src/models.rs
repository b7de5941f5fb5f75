pub mod auth;
pub mod rental;
pub mod report;
pub mod vehicle;
