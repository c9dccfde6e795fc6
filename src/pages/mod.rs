pub mod payment_success;
pub mod quiz;
