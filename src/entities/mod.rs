pub mod agency;
pub mod baggage;
pub mod cancellation;
pub mod discount_rule;
pub mod passenger;
pub mod payment;
pub mod penalty_rule;
pub mod port;
pub mod reservation;
pub mod reservation_detail;
pub mod route;
pub mod route_fare;
pub mod trip;
pub mod user;
pub mod vessel;
