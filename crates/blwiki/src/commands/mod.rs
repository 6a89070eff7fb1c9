//! CLI command implementations.

pub(crate) mod check_config;
pub(crate) mod settings;
pub(crate) mod sync;

pub(crate) use check_config::CheckConfigArgs;
pub(crate) use sync::SyncArgs;
