use avian3d::prelude::Position;
use bevy::prelude::*;
use rand::prelude::*;

use super::state::*;

/// Cues below this blend weight come from animations that are fading out
pub const CUE_WEIGHT_THRESHOLD: f32 = 0.5;

/// Kind of timing cue raised by the animation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Footstep,
    Land,
}

/// Timing cue written by the animation layer when a clip reaches a footstep
/// or landing frame.
#[derive(Message, Debug, Clone, Copy)]
pub struct AnimationCue {
    pub entity: Entity,
    pub kind: CueKind,
    /// Blend weight of the clip that raised the cue
    pub weight: f32,
}

/// Audio event messages emitted by the player controller.
///
/// Consumers subscribe with `MessageReader<PlayerAudioMessage>` to play
/// sounds at `position`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PlayerAudioMessage {
    /// `variant` picks one of `PlayerConfig::footstep_variants` clips
    Footstep { position: Vec3, variant: usize },
    Landed { position: Vec3 },
}

/// Turns dominant animation cues into audio messages
pub fn relay_animation_cues(
    mut cues: MessageReader<AnimationCue>,
    query: Query<(&Position, &PlayerConfig), With<Player>>,
    mut writer: MessageWriter<PlayerAudioMessage>,
) {
    let mut rng = rand::thread_rng();

    for cue in cues.read() {
        let Ok((position, config)) = query.get(cue.entity) else {
            continue;
        };
        if let Some(message) = audio_for_cue(cue, position.0, config, &mut rng) {
            writer.write(message);
        }
    }
}

/// Audio message for a cue, or `None` when the cue's clip is not dominant
pub fn audio_for_cue(
    cue: &AnimationCue,
    position: Vec3,
    config: &PlayerConfig,
    rng: &mut impl Rng,
) -> Option<PlayerAudioMessage> {
    if cue.weight <= CUE_WEIGHT_THRESHOLD {
        return None;
    }

    match cue.kind {
        CueKind::Footstep if config.footstep_variants > 0 => Some(PlayerAudioMessage::Footstep {
            position,
            variant: rng.gen_range(0..config.footstep_variants),
        }),
        CueKind::Footstep => None,
        CueKind::Land => Some(PlayerAudioMessage::Landed { position }),
    }
}
