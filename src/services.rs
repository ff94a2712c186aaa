pub mod auth;
pub mod message_service;
pub mod rbac_service;
pub mod shift_service;
pub mod till_service;
pub mod time_service;
pub mod user_service;
pub mod venue_service;

pub use auth::AuthService;
pub use message_service::MessageService;
pub use shift_service::ShiftService;
pub use till_service::{TillService, TillStore};
pub use time_service::TimeService;
pub use user_service::UserService;
pub use venue_service::VenueService;
