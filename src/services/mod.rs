pub mod accounts;
pub mod catalog;
pub mod orders;
pub mod pricing;
pub mod validation;
