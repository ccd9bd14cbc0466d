//! Tactile feedback when the slider lands on center.
//!
//! Floem has no haptics API, so the host injects a [`TactileFeedback`]
//! implementation backed by whatever the platform offers. Without one the
//! pulse is skipped silently.

/// A platform haptic generator.
pub trait TactileFeedback {
    /// Called once when the port is installed, so the generator can warm up.
    fn prepare(&mut self) {}

    /// Emit one light impact.
    fn impact_occurred(&mut self);
}

impl<F: FnMut()> TactileFeedback for F {
    fn impact_occurred(&mut self) {
        self()
    }
}

/// Fires a pulse each time a value notification lands exactly on center.
pub struct CenterFeedback {
    port: Option<Box<dyn TactileFeedback>>,
    enabled: bool,
}

impl CenterFeedback {
    pub fn new(port: Option<Box<dyn TactileFeedback>>) -> Self {
        let mut feedback = Self {
            port: None,
            enabled: true,
        };
        feedback.set_port(port);
        feedback
    }

    pub fn set_port(&mut self, port: Option<Box<dyn TactileFeedback>>) {
        self.port = port.map(|mut p| {
            p.prepare();
            p
        });
    }

    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether a pulse was emitted.
    pub fn notify(&mut self, value: f32, center: f32) -> bool {
        if value != center || !self.enabled {
            return false;
        }
        match self.port.as_mut() {
            Some(port) => {
                log::debug!("center feedback pulse at {value}");
                port.impact_occurred();
                true
            }
            None => {
                log::trace!("center reached with no feedback port installed");
                false
            }
        }
    }
}

impl Default for CenterFeedback {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for CenterFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CenterFeedback")
            .field("has_port", &self.has_port())
            .field("enabled", &self.enabled)
            .finish()
    }
}
