//! Flash banners with self-canceling dismissal timers
//!
//! Each banner owns at most one pending single-shot timer. The timer is
//! armed on attach, canceled on detach, and driven from the app's tick
//! pass so all time-based state advances in one place.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long a banner stays up before dismissal starts
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(5000);

/// Length of the fade-out window
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(500);

/// How the timer dismisses a banner when it fires.
///
/// Chosen once when the banner is built, never switched at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissStrategy {
    /// Fade the banner out, then drop it from the stack
    #[default]
    Fade,
    /// Call the shared dismiss function, same path as a manual dismissal
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

/// Visible lifetime of a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Visible,
    Fading { since: Instant },
    Removed,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    pub state: BannerState,
    delay: Duration,
    fade: Duration,
    strategy: DismissStrategy,
    // Pending timer; None means unarmed or canceled
    armed_at: Option<Instant>,
}

impl Banner {
    pub fn new(message: impl Into<String>, kind: BannerKind, strategy: DismissStrategy) -> Self {
        Self {
            message: message.into(),
            kind,
            state: BannerState::Visible,
            delay: DEFAULT_DISMISS_DELAY,
            fade: DEFAULT_FADE_DURATION,
            strategy,
            armed_at: None,
        }
    }

    pub fn with_timing(mut self, delay: Duration, fade: Duration) -> Self {
        self.delay = delay;
        self.fade = fade;
        self
    }

    /// Arm the dismissal timer. Any prior pending timer is replaced, so a
    /// banner never carries two.
    pub fn attach(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    /// Cancel the pending timer. Safe to call repeatedly, or without ever
    /// having attached.
    pub fn detach(&mut self) {
        self.armed_at = None;
    }

    /// Shared dismissal path: used by the manual dismissal key and by the
    /// timer under [`DismissStrategy::Clear`].
    pub fn dismiss(&mut self) {
        self.detach();
        self.state = BannerState::Removed;
    }

    pub fn is_removed(&self) -> bool {
        self.state == BannerState::Removed
    }

    /// Advance the banner's lifecycle. The timer fires at most once; once
    /// it has, only the fade window remains to run out.
    pub fn tick(&mut self, now: Instant) {
        if let Some(armed) = self.armed_at {
            if now.duration_since(armed) >= self.delay {
                self.armed_at = None;
                match self.strategy {
                    DismissStrategy::Fade => {
                        if self.state == BannerState::Visible {
                            self.state = BannerState::Fading { since: now };
                        }
                        // Fade completion is observed on a later tick
                        return;
                    }
                    DismissStrategy::Clear => {
                        self.dismiss();
                        return;
                    }
                }
            }
        }

        if let BannerState::Fading { since } = self.state {
            if now.duration_since(since) >= self.fade {
                self.state = BannerState::Removed;
            }
        }
    }

    /// Fraction of the fade window elapsed: 0.0 while fully visible,
    /// 1.0 once gone.
    pub fn fade_progress(&self, now: Instant) -> f32 {
        match self.state {
            BannerState::Visible => 0.0,
            BannerState::Fading { since } => {
                let elapsed = now.duration_since(since).as_secs_f32();
                (elapsed / self.fade.as_secs_f32().max(f32::EPSILON)).clamp(0.0, 1.0)
            }
            BannerState::Removed => 1.0,
        }
    }
}

/// Ordered collection of live banners, oldest first
#[derive(Debug, Default)]
pub struct FlashStack {
    banners: Vec<Banner>,
}

impl FlashStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a banner and arm its timer
    pub fn push(&mut self, mut banner: Banner, now: Instant) {
        banner.attach(now);
        self.banners.push(banner);
    }

    /// Drive every banner and drop the ones that finished
    pub fn tick(&mut self, now: Instant) {
        for banner in &mut self.banners {
            banner.tick(now);
        }
        self.banners.retain(|b| !b.is_removed());
    }

    /// Manually dismiss the oldest banner
    pub fn dismiss_front(&mut self) {
        if let Some(banner) = self.banners.first_mut() {
            banner.dismiss();
        }
    }

    /// Cancel every pending timer without removing anything
    pub fn detach_all(&mut self) {
        for banner in &mut self.banners {
            banner.detach();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
