/// Turns a raw visibility signal (e.g. "the loader is on screen") into
/// next-page triggers.
///
/// Fires at most once per hidden-to-visible transition, and only while
/// armed. Re-arming starts a fresh subscription, so a transition observed
/// before the re-arm cannot leak into the new listing.
#[derive(Debug, Default)]
pub struct PaginationDriver {
    armed: bool,
    visible: bool,
    subscription: u64,
}

impl PaginationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.visible = false;
            self.subscription += 1;
        }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.visible = false;
    }

    pub fn rearm(&mut self) {
        self.disarm();
        self.arm();
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Incremented on every fresh subscription.
    pub fn subscription(&self) -> u64 {
        self.subscription
    }

    /// Feed one visibility observation; returns true when a page load
    /// should be triggered.
    pub fn signal(&mut self, visible: bool) -> bool {
        if !self.armed {
            return false;
        }
        let fire = visible && !self.visible;
        self.visible = visible;
        fire
    }
}
