// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition only. Handlers here get no caller context and must
// validate all of their input.
pub mod auth;
