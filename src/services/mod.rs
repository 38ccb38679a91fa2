pub mod booking_service;
pub mod calendar_service;
pub mod loyalty_service;
pub mod payment_service;
pub mod pricing_service;
pub mod review_service;
pub mod search_service;
pub mod simulated_task;
pub mod two_factor_service;
pub mod validation;
pub mod wizard_service;
