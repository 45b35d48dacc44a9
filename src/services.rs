pub mod auth;
pub use auth::AuthService;
pub mod restaurant_service;
pub use restaurant_service::RestaurantService;
pub mod location_service;
pub use location_service::LocationService;
pub mod assignment_service;
pub use assignment_service::AssignmentService;
pub mod role_service;
pub use role_service::RoleService;
