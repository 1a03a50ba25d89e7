pub mod console;
pub mod session;
