pub mod oneshot_invocation;
pub mod persistent_session;
pub mod statistics;
