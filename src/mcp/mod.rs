pub mod protocol;
pub mod resources;
pub mod session;
pub mod tools;
