// Credit top-up payment requests.
// Users file a claim after paying out of band; admins approve or reject it
// from the dashboard, and approval grants the plan's credits.

pub mod handlers;
