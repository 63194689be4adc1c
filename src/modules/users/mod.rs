pub mod queries;
pub mod service;

pub use service::UserService;
