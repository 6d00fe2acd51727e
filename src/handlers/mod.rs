pub mod agencies;
pub mod auth;
pub mod catalog;
pub mod reservations;
pub mod rules;
pub mod trips;
pub mod users;
