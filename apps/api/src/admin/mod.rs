// Privileged admin surface.
// Every handler re-checks the admin role against the user_roles table —
// client-asserted role flags are never consulted.

pub mod actions;
pub mod handlers;
