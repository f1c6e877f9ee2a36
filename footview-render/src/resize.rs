//! Debounced renderer resizing

/// Supersampling factor for a device pixel ratio.
///
/// High density screens already have many pixels, so they get a smaller
/// factor.
pub fn supersampling_factor(pixel_ratio: f32) -> f32 {
    if pixel_ratio > 1.0 {
        std::f32::consts::SQRT_2
    } else {
        2.0
    }
}

/// Offscreen target size for a surface of `width` x `height` CSS pixels
pub fn render_target_size(width: u32, height: u32, pixel_ratio: f32, supersampling: f32) -> (u32, u32) {
    let scale = supersampling * pixel_ratio;
    (
        (width as f32 * scale).floor() as u32,
        (height as f32 * scale).floor() as u32,
    )
}

/// Trailing-edge debounce with a maximum wait.
///
/// Calls within `wait_ms` of each other collapse into one; a burst never
/// delays the trailing call by more than `max_wait_ms` after its first call.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    pub wait_ms: f64,
    pub max_wait_ms: f64,
    first_call: Option<f64>,
    last_call: Option<f64>,
}

impl Debouncer {
    pub fn new(wait_ms: f64, max_wait_ms: f64) -> Self {
        Self {
            wait_ms,
            max_wait_ms: max_wait_ms.max(wait_ms),
            first_call: None,
            last_call: None,
        }
    }

    /// Record a call at `now_ms`
    pub fn call(&mut self, now_ms: f64) {
        if self.first_call.is_none() {
            self.first_call = Some(now_ms);
        }
        self.last_call = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_call.is_some()
    }

    /// True once when the pending call is due
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let (Some(first), Some(last)) = (self.first_call, self.last_call) else {
            return false;
        };
        if now_ms - last >= self.wait_ms || now_ms - first >= self.max_wait_ms {
            self.cancel();
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.first_call = None;
        self.last_call = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(400.0, 400.0)
    }
}
