/// Edge produced when the cooling-down flag changes value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownTransition {
    Started,
    Ended,
}

/// Post-damage invulnerability window, advanced explicitly by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownTimer {
    remaining: f32,
    active: bool,
}

impl CooldownTimer {
    /// (Re)starts the window. A running timer is reset to `duration` without
    /// reporting a second start.
    pub fn start(&mut self, duration: f32) -> Option<CooldownTransition> {
        if duration.is_nan() || duration <= 0.0 {
            return None;
        }
        self.remaining = duration;
        self.set_active(true)
    }

    pub fn tick(&mut self, elapsed: f32) -> Option<CooldownTransition> {
        if !self.active {
            return None;
        }
        if elapsed.is_finite() && elapsed > 0.0 {
            self.remaining -= elapsed;
        }
        if self.remaining <= 0.0 {
            self.set_active(false)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<CooldownTransition> {
        self.set_active(false)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Always `0` while inactive, whatever the stored countdown holds.
    pub fn remaining(&self) -> f32 {
        if self.active {
            self.remaining.max(0.0)
        } else {
            0.0
        }
    }

    fn set_active(&mut self, active: bool) -> Option<CooldownTransition> {
        if self.active == active {
            return None;
        }
        self.active = active;
        Some(if active {
            CooldownTransition::Started
        } else {
            CooldownTransition::Ended
        })
    }
}
