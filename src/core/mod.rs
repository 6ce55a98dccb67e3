pub mod fallback;

pub use crate::domain::model::{Attempt, FallbackPolicy, StatusRange};
pub use crate::domain::ports::UsersService;
pub use crate::utils::error::Result;
