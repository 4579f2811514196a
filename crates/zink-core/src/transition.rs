//! Fade-to-black scene transition.
//!
//! ```text
//! Idle --start--> FadingOut --(FADE_DURATION)--> Loading --> FadingIn --(FADE_DURATION)--> Idle
//!                                  emits Load                          emits Finished
//! ```
//!
//! The host drives the machine with the frame delta and loads the next scene
//! when [`TransitionSignal::Load`] comes out. Dropping the value cancels the
//! transition.

/// Seconds each fade takes.
pub const FADE_DURATION: f32 = 0.1;

/// Transition state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionState {
    /// No transition running
    #[default]
    Idle,
    /// Screen going dark
    FadingOut {
        /// Seconds since the fade started
        elapsed: f32,
    },
    /// Screen fully dark while the host swaps scenes
    Loading,
    /// Screen coming back
    FadingIn {
        /// Seconds since the fade started
        elapsed: f32,
    },
}

/// Events for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionSignal {
    /// The screen is dark: load the next scene now
    Load,
    /// The transition is over
    Finished,
}

/// Scene transition state machine.
#[derive(Debug, Clone, Default)]
pub struct SceneTransition {
    state: TransitionState,
}

impl SceneTransition {
    /// Create an idle transition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Check whether a transition is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != TransitionState::Idle
    }

    /// Begin fading out. Ignored while a transition is already running.
    ///
    /// Returns `true` if the transition started.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = TransitionState::FadingOut { elapsed: 0.0 };
        true
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Option<TransitionSignal> {
        match self.state {
            TransitionState::Idle => None,
            TransitionState::FadingOut { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= FADE_DURATION {
                    tracing::debug!("Fade out complete, loading scene");
                    self.state = TransitionState::Loading;
                    Some(TransitionSignal::Load)
                } else {
                    self.state = TransitionState::FadingOut { elapsed };
                    None
                }
            }
            TransitionState::Loading => {
                self.state = TransitionState::FadingIn { elapsed: 0.0 };
                None
            }
            TransitionState::FadingIn { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= FADE_DURATION {
                    self.state = TransitionState::Idle;
                    Some(TransitionSignal::Finished)
                } else {
                    self.state = TransitionState::FadingIn { elapsed };
                    None
                }
            }
        }
    }

    /// Opacity of the black overlay, in `[0, 1]`.
    #[must_use]
    pub fn overlay_alpha(&self) -> f32 {
        match self.state {
            TransitionState::Idle => 0.0,
            TransitionState::FadingOut { elapsed } => (elapsed / FADE_DURATION).clamp(0.0, 1.0),
            TransitionState::Loading => 1.0,
            TransitionState::FadingIn { elapsed } => {
                (1.0 - elapsed / FADE_DURATION).clamp(0.0, 1.0)
            }
        }
    }
}
