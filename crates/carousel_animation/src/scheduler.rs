//! Animation scheduler
//!
//! Owns every running scalar animation and advances them each frame.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::Result;
use crate::spring::{Spring, SpringConfig};
use crate::tween::Tween;

new_key_type! {
    pub struct AnimationId;
}

enum Motion {
    Tween(Tween),
    /// Spring runs in normalized progress space (0 → 1) for a fixed
    /// settling duration, then lands exactly on the target.
    Spring {
        spring: Spring,
        duration: f32,
        elapsed: f32,
    },
}

struct ScalarAnimation {
    from: f32,
    to: f32,
    motion: Motion,
}

impl ScalarAnimation {
    fn value(&self) -> f32 {
        match &self.motion {
            Motion::Tween(tween) => tween.value(),
            Motion::Spring { spring, .. } => self.from + (self.to - self.from) * spring.value(),
        }
    }

    fn advance(&mut self, dt: f32) -> bool {
        match &mut self.motion {
            Motion::Tween(tween) => {
                tween.advance(dt);
                tween.is_done()
            }
            Motion::Spring {
                spring,
                duration,
                elapsed,
            } => {
                spring.step(dt);
                *elapsed += dt;
                if *elapsed >= *duration {
                    spring.snap_to_target();
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// An animation that ran to its end during [`AnimationScheduler::tick`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishedAnimation {
    pub id: AnimationId,
    pub value: f32,
}

/// The animation scheduler that ticks all active animations
#[derive(Default)]
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, ScalarAnimation>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timed curve from `from` to `to` lasting `duration` seconds
    pub fn add_tween(&mut self, from: f32, to: f32, duration: f32, easing: Easing) -> Result<AnimationId> {
        let tween = Tween::new(from, to, duration, easing)?;
        tracing::trace!("tween {from:.1} -> {to:.1} over {duration:.3}s");
        Ok(self.animations.insert(ScalarAnimation {
            from,
            to,
            motion: Motion::Tween(tween),
        }))
    }

    /// Start a damped spring from `from` to `to`.
    ///
    /// `initial_velocity` is expressed in full distances per second, so 1.0
    /// means "would cover the whole distance in one second".
    pub fn add_spring(
        &mut self,
        from: f32,
        to: f32,
        config: SpringConfig,
        initial_velocity: f32,
    ) -> Result<AnimationId> {
        config.validate()?;
        let duration = config.settling_duration(initial_velocity);
        let mut spring = Spring::new(config, 0.0)
            .with_velocity(initial_velocity)
            .with_rest_threshold(0.001);
        spring.set_target(1.0);
        tracing::trace!("spring {from:.1} -> {to:.1}, settling in {duration:.3}s");
        Ok(self.animations.insert(ScalarAnimation {
            from,
            to,
            motion: Motion::Spring {
                spring,
                duration,
                elapsed: 0.0,
            },
        }))
    }

    /// Value currently being presented by an animation
    pub fn value(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(id).map(ScalarAnimation::value)
    }

    /// Final value an animation is heading to
    pub fn target(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(id).map(|a| a.to)
    }

    pub fn is_active(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id)
    }

    /// Stop an animation where it is, returning the value it was presenting
    pub fn cancel(&mut self, id: AnimationId) -> Option<f32> {
        self.animations.remove(id).map(|a| a.value())
    }

    /// Advance all animations by `dt` seconds, removing and returning the
    /// ones that finished.
    pub fn tick(&mut self, dt: f32) -> SmallVec<[FinishedAnimation; 2]> {
        let mut finished: SmallVec<[FinishedAnimation; 2]> = SmallVec::new();
        for (id, animation) in self.animations.iter_mut() {
            if animation.advance(dt) {
                finished.push(FinishedAnimation {
                    id,
                    value: animation.to,
                });
            }
        }
        for done in &finished {
            self.animations.remove(done.id);
        }
        finished
    }

    pub fn has_active_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}
