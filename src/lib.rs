//! # playgate
//!
//! Session route guards for the game catalogue client.
//!
//! Every route is wrapped in one of two guards. The protected guard lets a
//! visitor through only after the auth probe confirms a live session; the
//! reverse guard keeps signed-in visitors off the login and face-enrollment
//! pages. The probe asks the password-session and biometric-session backends
//! in parallel and accepts either.
//!
//! This crate contains the probe, both guards, the post-login callback
//! handler, the static route table, and a router that mounts them against an
//! in-memory history. Rendering is left to the UI layer through [`view::View`].

pub mod callback;
pub mod config;
pub mod guard;
pub mod history;
pub mod probe;
pub mod router;
pub mod routes;
pub mod session;
pub mod view;
