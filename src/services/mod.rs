pub mod authorization;
pub mod baggage;
pub mod codes;
pub mod commission;
pub mod penalty;
pub mod pricing;
pub mod reservation;
