pub mod email_service;
pub mod google_service;
pub mod scheduler_service;

pub use email_service::Mailer;
pub use google_service::GoogleVerifier;
pub use scheduler_service::SchedulerClient;
