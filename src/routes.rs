mod error;
mod health_check;
mod ingredients;
mod login;
mod recipes;
mod tags;
mod users;

pub use error::ApiError;
pub use health_check::*;
pub use ingredients::*;
pub use login::*;
pub use recipes::*;
pub use tags::*;
pub use users::*;
