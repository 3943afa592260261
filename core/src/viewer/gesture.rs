//! Maps raw pointer, touch and key input onto viewer navigation.

use crate::types::ViewerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Prev,
    Next,
}

/// Keys the viewer reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

impl ViewerKey {
    /// Parses a key name as reported by the platform (`ArrowLeft`, `Escape`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }

    /// `None` means the key closes the viewer.
    pub fn navigation(self) -> Option<Navigation> {
        match self {
            Self::ArrowLeft => Some(Navigation::Prev),
            Self::ArrowRight => Some(Navigation::Next),
            Self::Escape => None,
        }
    }
}

/// Tap zones and swipe threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gestures {
    swipe_threshold: f32,
    tap_zone_fraction: f32,
}

impl Gestures {
    pub fn new(swipe_threshold: f32, tap_zone_fraction: f32) -> Self {
        Self {
            swipe_threshold,
            tap_zone_fraction,
        }
    }

    /// Left zone goes back, right zone goes forward, the middle is inert.
    ///
    /// `x` is measured from the left edge of a viewer `width` wide.
    pub fn tap(&self, x: f32, width: f32) -> Option<Navigation> {
        if x < width * self.tap_zone_fraction {
            Some(Navigation::Prev)
        } else if x > width * (1.0 - self.tap_zone_fraction) {
            Some(Navigation::Next)
        } else {
            None
        }
    }

    /// A leftward drag beyond the threshold goes forward, a rightward one back.
    pub fn swipe(&self, start_x: f32, end_x: f32) -> Option<Navigation> {
        let diff = start_x - end_x;
        if diff.abs() <= self.swipe_threshold {
            return None;
        }

        if diff > 0.0 {
            Some(Navigation::Next)
        } else {
            Some(Navigation::Prev)
        }
    }
}

impl From<&ViewerConfig> for Gestures {
    fn from(config: &ViewerConfig) -> Self {
        Self::new(config.swipe_threshold_px, config.tap_zone_fraction)
    }
}

impl Default for Gestures {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}
