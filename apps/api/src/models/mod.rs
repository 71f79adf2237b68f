pub mod generation;
pub mod payment;
pub mod profile;
