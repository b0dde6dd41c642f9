pub mod email;
pub mod session;
