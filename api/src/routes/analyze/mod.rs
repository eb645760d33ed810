pub mod analyze_request;
pub mod analyze_route;
