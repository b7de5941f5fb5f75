pub mod auth;
pub mod catalog_service;
pub mod rental_service;
pub mod report_service;
pub mod user_service;
pub mod vehicle_service;
