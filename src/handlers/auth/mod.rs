pub mod login;
pub mod me;

pub use login::login;
pub use me::me;
