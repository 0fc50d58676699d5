mod email;
mod passwords;

pub use email::{is_valid_email, normalize_email};
pub use passwords::{hash_password, verify_password, PasswordHashError};
