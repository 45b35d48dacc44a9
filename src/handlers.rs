pub mod auth;
pub mod locations;
pub mod restaurants;
pub mod roles;
pub mod staff;
