pub mod analyze;
pub mod health_route;
