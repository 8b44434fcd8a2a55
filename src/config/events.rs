//! Event bus configuration

use serde::Deserialize;

use crate::adapters::DispatchMode;

/// Event bus configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    /// How handlers are run: `detached` or `inline`
    #[serde(default)]
    pub dispatch_mode: DispatchMode,
}
