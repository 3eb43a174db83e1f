pub mod authorization;
pub mod encoder;
pub mod handler;
pub mod status;

pub use encoder::{JwtUnsubscribeEncoder, UnsubscribeAction, UnsubscribeData, UnsubscribeEncoder};
pub use handler::{Actor, RequestOutcome, UnsubscribeHandler};
pub use status::DispatchStatus;
