pub mod error;
pub mod mailer;
pub mod message;
pub mod model;
pub mod store;
