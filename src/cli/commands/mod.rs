pub mod password;
pub mod ping;
pub mod resources;
pub mod seed;
