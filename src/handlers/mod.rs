// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth). Protected routes receive the
// caller's Identity from jwt_auth_middleware.
pub mod public;
pub mod protected;
