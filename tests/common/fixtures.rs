//! Test fixtures and data factories

use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use users_console_lib::types::NewUser;

/// Email that no other fixture will produce
pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

/// A valid user with a random name and unique email
pub fn new_user() -> NewUser {
    NewUser {
        name: Name().fake(),
        email: unique_email(),
        age: Some((18..80).fake()),
        phone: None,
    }
}

pub fn new_user_with_phone(phone: &str) -> NewUser {
    NewUser {
        phone: Some(phone.to_string()),
        ..new_user()
    }
}
