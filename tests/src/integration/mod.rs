//! End-to-end discovery flows.

pub mod flows;
pub mod support;
