//! Player intent coming from the host.
//!
//! The presentation layer samples its devices and hands the simulation a
//! continuous `MoveInput` every frame plus a list of discrete commands.

use serde::{Deserialize, Serialize};

use crate::components::Perk;

/// Analog movement axes, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveInput {
    /// +1 = forward, -1 = back
    pub forward: f32,
    /// +1 = right, -1 = left
    pub strafe: f32,
    /// +1 = turn right, -1 = turn left
    pub turn: f32,
}

impl MoveInput {
    /// Clamp every axis into [-1, 1], zeroing NaN
    pub fn sanitized(self) -> Self {
        let axis = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            forward: axis(self.forward),
            strafe: axis(self.strafe),
            turn: axis(self.turn),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0
    }
}

/// Discrete player actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "camelCase")]
pub enum PlayerCommand {
    /// Hotbar trigger (1..N)
    CastSlot(u8),
    /// Cast by ability id
    Cast(String),
    /// Talk to the nearest NPC or use the nearest interactable
    Interact,
    /// Tab-target the next enemy by distance
    CycleTarget,
    /// Pick an entry from the open conversation
    Choose(usize),
    CloseDialogue,
    /// Buy a vendor stock line by index
    Buy(usize),
    Sell(String),
    Equip(String),
    UseItem(String),
    ChoosePerk(Perk),
    Save,
    TogglePause,
}
