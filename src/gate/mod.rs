//! Request gate: per-request admission checks made at the edge.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate runs before any page is served. It sees only the request path
//! and the `fb-authed` session summary cookie written by the identity store,
//! so it never calls the identity backend.
//!
//! TRADE-OFFS
//! ==========
//! The cookie carries no role, so the gate cannot keep a signed-in
//! non-admin out of `/admin`. Admin pages finish that check client-side with
//! [`crate::identity::guard::admin_access`] once the store has settled.

pub mod decision;
pub mod middleware;
pub mod summary;
pub mod zone;

pub use decision::{GateDecision, GatePaths, decide};
pub use middleware::request_gate;
pub use summary::{SUMMARY_COOKIE, SessionSummary};
pub use zone::RouteZone;
