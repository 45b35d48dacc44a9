pub mod user_repo;
pub use user_repo::UserRepository;
pub mod restaurant_repo;
pub use restaurant_repo::RestaurantRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod assignment_repo;
pub use assignment_repo::AssignmentRepository;
pub mod role_repo;
pub use role_repo::RoleRepository;
