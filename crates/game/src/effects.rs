//! Fire-and-forget effect requests handed to the presentation layer.
//!
//! The simulation never renders or plays anything itself. Gameplay code
//! pushes requests here during the tick; the host drains them afterwards
//! and may drop them entirely (a headless match runs fine). Nothing in
//! this queue feeds back into simulation state.

use engine_core::Vec3;

/// Sound cues the host may map to actual audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    GunShot,
    Explosion,
    Footstep,
    HitMarker,
    BombPlant,
    Purchase,
    Reload,
}

/// One presentation request.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectRequest {
    SpawnParticles {
        position: Vec3,
        color: [f32; 3],
        count: u32,
    },
    PlaySound {
        cue: SoundCue,
    },
}

/// Particle colors used by the stock effects.
pub mod palette {
    /// Bullet impact sparks.
    pub const IMPACT: [f32; 3] = [1.0, 0.67, 0.0];
    /// Death burst.
    pub const DEATH: [f32; 3] = [1.0, 0.0, 0.0];
    /// HE grenade detonation.
    pub const EXPLOSION: [f32; 3] = [1.0, 0.2, 0.0];
    /// Bomb detonation at round end.
    pub const BOMB: [f32; 3] = [1.0, 0.0, 0.0];
    /// Flashbang pop.
    pub const FLASH: [f32; 3] = [1.0, 1.0, 1.0];
    /// Smoke cloud.
    pub const SMOKE: [f32; 3] = [0.53, 0.53, 0.53];
}

/// Buffer of effect requests for the current tick.
#[derive(Debug, Default)]
pub struct EffectQueue {
    requests: Vec<EffectRequest>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&mut self, position: Vec3, color: [f32; 3], count: u32) {
        self.requests.push(EffectRequest::SpawnParticles {
            position,
            color,
            count,
        });
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.requests.push(EffectRequest::PlaySound { cue });
    }

    /// Hand the buffered requests to the host, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
