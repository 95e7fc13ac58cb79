pub mod health;
pub mod jobs;
pub mod twilio;
pub mod webhook;

pub use health::health_handler;
pub use jobs::jobs_handler;
pub use twilio::twilio_webhook_handler;
pub use webhook::webhook_handler;
