pub mod exams;
pub mod users;

pub use self::users::model::{Role, User};
