//! Base plugin trait definition.
//!
//! All plugins must implement the `Plugin` trait, which provides basic
//! lifecycle management and metadata methods.

use crate::Result;

/// Base trait that all plugins must implement.
///
/// # Thread Safety
///
/// All plugins must be `Send + Sync` to support concurrent usage across threads.
///
/// # Example
///
/// ```rust
/// use docsift::plugins::Plugin;
/// use docsift::Result;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct MyPlugin {
///     initialized: AtomicBool,
/// }
///
/// impl Plugin for MyPlugin {
///     fn name(&self) -> &str {
///         "my-plugin"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         self.initialized.store(true, Ordering::Release);
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         self.initialized.store(false, Ordering::Release);
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin.
    ///
    /// Names are validated at registration: non-empty, no whitespace,
    /// lowercase with hyphens (e.g. `"pdf-decoder"`).
    fn name(&self) -> &str;

    /// Semantic version of this plugin (`MAJOR.MINOR.PATCH`).
    fn version(&self) -> String;

    /// Initialize the plugin.
    ///
    /// Called once when the plugin is registered. Takes `&self` to work with
    /// `Arc<dyn Plugin>`; plugins needing mutable state during initialization
    /// should use interior mutability.
    ///
    /// # Errors
    ///
    /// The plugin is not registered if this method returns an error.
    fn initialize(&self) -> Result<()>;

    /// Shutdown the plugin.
    ///
    /// Called when the plugin is unregistered.
    fn shutdown(&self) -> Result<()>;

    /// Optional plugin description for debugging and logging.
    fn description(&self) -> &str {
        ""
    }
}
