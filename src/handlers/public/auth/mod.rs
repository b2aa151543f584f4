pub mod login;
pub mod register;
pub mod session;

pub use login::login;
pub use register::register;
pub use session::{health, logout};
