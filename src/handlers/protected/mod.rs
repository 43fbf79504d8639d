pub mod account;
pub mod orders;
