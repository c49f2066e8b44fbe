// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token resolved to a live user)
pub mod public;    // /api/auth/register, /api/auth/login
pub mod protected; // /api/auth/me, /api/todos/*
