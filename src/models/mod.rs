pub mod booking;
pub mod catalog;
pub mod currency;
pub mod pricing;
pub mod review;
pub mod user;
pub mod wizard;
