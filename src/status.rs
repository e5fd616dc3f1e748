use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ERROR_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
struct StatusState {
    /// Persistent text: the active filter.
    badge: String,
    /// Transient text shown over the badge until it expires.
    message: Option<String>,
    generation: u64,
}

/// Footer status text. Transient messages revert to the filter badge after
/// their duration; each message bumps a generation counter so the revert
/// scheduled by an older message does nothing once a newer one is shown.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    inner: Arc<Mutex<StatusState>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        match self.inner.lock() {
            Ok(state) => state.message.clone().unwrap_or_else(|| state.badge.clone()),
            Err(_) => String::new(),
        }
    }

    pub fn set_filter(&self, filter: &str) {
        if let Ok(mut state) = self.inner.lock() {
            state.badge = format!(" {} ", filter);
        }
    }

    /// Show `message` for `duration`. Needs a tokio runtime for the revert;
    /// without one the message stays until replaced.
    pub fn flash(&self, message: impl Into<String>, duration: Duration) {
        let generation = match self.inner.lock() {
            Ok(mut state) => {
                state.generation += 1;
                state.message = Some(message.into());
                state.generation
            }
            Err(_) => return,
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("No runtime, status message will not revert");
            return;
        };
        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Ok(mut state) = inner.lock() {
                if state.generation == generation {
                    state.message = None;
                }
            }
        });
    }

    pub fn error(&self, err: &dyn Display) {
        log::warn!("{}", err);
        self.flash(format!(" ERROR - {} ", err), ERROR_DURATION);
    }
}
