// handlers/public/auth/mod.rs - Token acquisition endpoints
pub mod login;    // POST /api/auth/login
pub mod register; // POST /api/auth/register

pub use login::login_post;
pub use register::register_post;
