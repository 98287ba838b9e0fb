//! Session gate for the enrollment site: a client-resident identity store
//! that mirrors sign-in state into the `fb-authed` cookie, and an edge
//! middleware that routes requests on that cookie alone.

pub mod config;
pub mod gate;
pub mod identity;
pub mod routes;
pub mod state;
