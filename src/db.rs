pub mod user_repo;
pub use user_repo::UserRepository;
pub mod venue_repo;
pub use venue_repo::VenueRepository;
pub mod shift_repo;
pub use shift_repo::ShiftRepository;
pub mod time_repo;
pub use time_repo::TimeEntryRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
pub mod till_repo;
pub use till_repo::TillRepository;
