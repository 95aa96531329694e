//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Device class detection (user agent sniffing)
//! - Frame timestamps for the tick loop

use crate::config::DeviceClass;

/// User agent fragments that mark a phone or tablet browser
const MOBILE_MARKERS: [&str; 5] = ["mobi", "android", "iphone", "ipad", "ipod"];

/// Classify a browser by its user agent string
pub fn detect_device_class(user_agent: &str) -> DeviceClass {
    let ua = user_agent.to_lowercase();
    if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    }
}

/// Millisecond timestamps for native hosts (the browser supplies its own)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    /// Milliseconds since the clock was created
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
