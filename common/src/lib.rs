//! Ambient plumbing shared by every crate in the workspace: logger
//! initialization, span helpers and correlation ids.

pub mod logger;

pub use logger::{LogFormat, TraceId, child_span, init_logger, root_span, warn_if_slow};
