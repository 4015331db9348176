mod caller;
mod error;
mod user;

pub use caller::Caller;
pub use user::UserService;

pub use error::{ServiceError, ServiceResult};
