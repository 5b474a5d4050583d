//! Game engine - owns all game state and provides a clean API to the host.
//!
//! The engine handles:
//! - Game state (world, content, quest log, clock)
//! - Player commands from the host
//! - Simulation advancement inside a panic guard
//!
//! The host (the headless runner, or a renderer) only handles:
//! - Sampling input into `MoveInput` and `PlayerCommand`s
//! - Presenting what `FrameReport` returns

mod game_state;
pub mod initialization;
mod simulation;

pub use game_state::{GameRng, GameState};
pub use simulation::*;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use glam::Vec3;
use hecs::Entity;
use log::{info, warn};

use crate::components::{Health, PlayerStats, Shield, Spellbook, Target, Transform};
use crate::config::SimConfig;
use crate::content::{AbilityDef, ContentDb, VendorStock};
use crate::error::{ContentError, SaveError, SimError};
use crate::events::GameEvent;
use crate::input::{MoveInput, PlayerCommand};
use crate::save;
use crate::systems::abilities::{self, CastOutcome};
use crate::systems::dialogue::{
    npc_choices, reset_dialogue, select_option, start_dialogue, Conversation, DialogueChoice,
    OptionOutcome,
};
use crate::systems::interact::{self, InteractOutcome};
use crate::systems::inventory::{self, ItemOutcome};
use crate::systems::vendor::{self, TradeOutcome};
use crate::systems::{experience, quests, targeting};

/// Whether the simulation is advancing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    Paused,
    /// A tick failed; the world is frozen and `reason` says why
    Errored { reason: String },
}

/// Result of a conversation command
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueOutcome {
    Accepted(String),
    TurnedIn(String),
    Wares(Vec<VendorStock>),
    /// Entered the NPC's dialogue tree
    Conversing,
    Option(OptionOutcome),
    Closed,
    NoConversation,
    Invalid,
}

/// What one `PlayerCommand` did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Cast(CastOutcome),
    Interact(InteractOutcome),
    Target(Option<Entity>),
    Dialogue(DialogueOutcome),
    Trade(TradeOutcome),
    Item(ItemOutcome),
    Perk(bool),
    Saved(bool),
    Paused(bool),
    /// Unknown ability or slot, or the engine is paused
    Ignored,
}

/// Read-only view of the player for the host's HUD
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub position: Vec3,
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub fatigue: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub gold: u32,
    pub talents: u32,
    pub zone: String,
    pub target: Option<Entity>,
    /// Ability id and fill fraction of the cast bar
    pub casting: Option<(String, f32)>,
}

/// Everything a host needs after one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub time: f32,
    pub status: EngineStatus,
    pub events: Vec<GameEvent>,
    pub outcomes: Vec<CommandOutcome>,
    pub player: Option<PlayerView>,
}

/// The game engine - owns the state and drives it frame by frame.
pub struct GameEngine {
    pub state: GameState,
    pub status: EngineStatus,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "unknown panic".to_string()
}

impl GameEngine {
    /// Load content, build the world and merge the save if one exists.
    /// A save that cannot be read is logged and ignored.
    pub fn new(config: SimConfig) -> Result<Self, ContentError> {
        let content = match config.content_dir.as_deref() {
            Some(dir) => ContentDb::load_dir(dir)?,
            None => ContentDb::builtin(),
        };
        let mut engine = Self::from_state(GameState::new(config, content));
        engine.load_save();
        Ok(engine)
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            status: EngineStatus::Running,
        }
    }

    fn load_save(&mut self) {
        let Some(path) = self.state.config.save_path.clone() else {
            return;
        };
        if !path.exists() {
            info!("no save at {}, starting fresh", path.display());
            return;
        }
        let state = &mut self.state;
        let loaded = save::read_save(&path).and_then(|data| {
            save::apply_save(
                &mut state.world,
                state.player,
                &state.content,
                &mut state.quest_log,
                &data,
            )
        });
        if let Err(err) = loaded {
            warn!("ignoring save {}: {err}", path.display());
        }
    }

    /// Write the save now. `Ok(false)` when no save path is configured.
    pub fn save(&self) -> Result<bool, SaveError> {
        save_now(&self.state)
    }

    /// Apply `commands`, then advance by `dt`. A failing or panicking frame
    /// freezes the engine in `EngineStatus::Errored`; later frames keep
    /// reporting without simulating.
    pub fn frame(&mut self, dt: f32, input: MoveInput, commands: &[PlayerCommand]) -> FrameReport {
        puffin::profile_function!();
        let (outcomes, events) = if matches!(self.status, EngineStatus::Errored { .. }) {
            (Vec::new(), Vec::new())
        } else {
            let stepped = panic::catch_unwind(AssertUnwindSafe(|| self.step(dt, input, commands)));
            let failure = match stepped {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(err)) => Err(err),
                Err(payload) => Err(SimError::Panicked(panic_message(payload))),
            };
            failure.unwrap_or_else(|err| {
                warn!("simulation halted: {err}");
                self.status = EngineStatus::Errored {
                    reason: err.to_string(),
                };
                (Vec::new(), Vec::new())
            })
        };

        FrameReport {
            time: self.state.clock.time,
            status: self.status.clone(),
            events,
            outcomes,
            player: self.player_view(),
        }
    }

    fn step(
        &mut self,
        dt: f32,
        input: MoveInput,
        commands: &[PlayerCommand],
    ) -> Result<(Vec<CommandOutcome>, Vec<GameEvent>), SimError> {
        let outcomes = commands.iter().map(|c| self.apply_command(c)).collect();
        if self.status == EngineStatus::Paused {
            return Ok((outcomes, Vec::new()));
        }
        let events = tick(&mut self.state, input, dt)?;
        Ok((outcomes, events))
    }

    /// Carry out one player command against the current state
    pub fn apply_command(&mut self, command: &PlayerCommand) -> CommandOutcome {
        let paused = self.status == EngineStatus::Paused;
        if paused && !matches!(command, PlayerCommand::TogglePause | PlayerCommand::Save) {
            return CommandOutcome::Ignored;
        }

        let state = &mut self.state;
        let player = state.player;
        match command {
            PlayerCommand::CastSlot(slot) => match state.content.ability_in_slot(*slot) {
                Some(ability) => CommandOutcome::Cast(cast(state, ability.clone())),
                None => CommandOutcome::Ignored,
            },
            PlayerCommand::Cast(id) => match state.content.ability(id) {
                Some(ability) => CommandOutcome::Cast(cast(state, ability.clone())),
                None => CommandOutcome::Ignored,
            },
            PlayerCommand::Interact => {
                let outcome = interact::handle_interact(&state.world, player, &mut state.events);
                if let InteractOutcome::Talked { npc } = &outcome {
                    state.conversation = Some(Conversation::new(npc));
                }
                CommandOutcome::Interact(outcome)
            }
            PlayerCommand::CycleTarget => {
                CommandOutcome::Target(targeting::cycle_target(&mut state.world, player))
            }
            PlayerCommand::Choose(index) => CommandOutcome::Dialogue(choose(state, *index)),
            PlayerCommand::CloseDialogue => {
                state.conversation = None;
                CommandOutcome::Dialogue(DialogueOutcome::Closed)
            }
            PlayerCommand::Buy(index) => {
                if !at_vendor(state) {
                    return CommandOutcome::Dialogue(DialogueOutcome::NoConversation);
                }
                CommandOutcome::Trade(vendor::buy(&mut state.world, player, &state.content, *index))
            }
            PlayerCommand::Sell(item) => {
                if !at_vendor(state) {
                    return CommandOutcome::Dialogue(DialogueOutcome::NoConversation);
                }
                CommandOutcome::Trade(vendor::sell(&mut state.world, player, &state.content, item))
            }
            PlayerCommand::Equip(item) => CommandOutcome::Item(inventory::equip_item(
                &mut state.world,
                player,
                &state.content,
                item,
            )),
            PlayerCommand::UseItem(item) => CommandOutcome::Item(inventory::use_consumable(
                &mut state.world,
                player,
                &state.content,
                item,
            )),
            PlayerCommand::ChoosePerk(perk) => CommandOutcome::Perk(experience::choose_perk(
                &mut state.world,
                player,
                &state.content,
                *perk,
            )),
            PlayerCommand::Save => CommandOutcome::Saved(autosave(state)),
            PlayerCommand::TogglePause => {
                self.status = if paused {
                    EngineStatus::Running
                } else {
                    EngineStatus::Paused
                };
                info!("{}", if paused { "resumed" } else { "paused" });
                CommandOutcome::Paused(!paused)
            }
        }
    }

    /// Snapshot of the player for display, `None` if the player is gone
    pub fn player_view(&self) -> Option<PlayerView> {
        let state = &self.state;
        let mut query = state
            .world
            .query_one::<(
                &Transform,
                &Health,
                &Shield,
                &PlayerStats,
                &Spellbook,
                &Target,
            )>(state.player)
            .ok()?;
        let (transform, health, shield, stats, spellbook, target) = query.get()?;
        let casting = spellbook.cast.as_ref().map(|cast| {
            let total = cast.ability.cast_time.max(f32::EPSILON);
            (cast.ability.id.clone(), (1.0 - cast.remaining / total).clamp(0.0, 1.0))
        });

        Some(PlayerView {
            position: transform.pos,
            yaw: transform.yaw,
            health: health.current,
            max_health: health.max,
            shield: shield.amount,
            mana: stats.mana.current,
            max_mana: stats.mana.max,
            fatigue: stats.fatigue.current,
            level: stats.level,
            xp: stats.xp,
            xp_to_next: stats.xp_to_next,
            gold: stats.gold,
            talents: stats.talents,
            zone: state.content.zone_name(transform.pos).to_string(),
            target: target.0,
            casting,
        })
    }
}

fn cast(state: &mut GameState, ability: AbilityDef) -> CastOutcome {
    abilities::attempt_cast(
        &mut state.world,
        state.player,
        &ability,
        &state.arena,
        &state.rules,
        &mut state.events,
    )
}

fn at_vendor(state: &GameState) -> bool {
    state
        .conversation
        .as_ref()
        .and_then(|c| state.content.npc(&c.npc))
        .is_some_and(|npc| npc.vendor)
}

/// Pick entry `index` from the open conversation: the top-level menu, or
/// the current node of the NPC's dialogue tree
fn choose(state: &mut GameState, index: usize) -> DialogueOutcome {
    let player = state.player;
    let Some(conversation) = state.conversation.as_mut() else {
        return DialogueOutcome::NoConversation;
    };
    let Some(npc) = state.content.npc(&conversation.npc) else {
        state.conversation = None;
        return DialogueOutcome::NoConversation;
    };

    if conversation.node.is_some() {
        let Some(tree) = npc.dialogue.as_ref() else {
            reset_dialogue(conversation);
            return DialogueOutcome::Invalid;
        };
        let outcome = {
            let Ok(mut stats) = state.world.get::<&mut PlayerStats>(player) else {
                return DialogueOutcome::Invalid;
            };
            select_option(conversation, tree, &mut stats, index)
        };
        let xp = match outcome {
            OptionOutcome::Continued { xp, .. } | OptionOutcome::Ended { xp } => xp,
            OptionOutcome::CannotAfford | OptionOutcome::Invalid => 0,
        };
        if xp > 0 {
            experience::award_xp(&mut state.world, player, &state.content, xp, &mut state.events);
        }
        return DialogueOutcome::Option(outcome);
    }

    let choices = npc_choices(npc, &state.content, &state.quest_log);
    match choices.get(index) {
        Some(DialogueChoice::AcceptQuest(id)) => {
            if quests::start_quest(&mut state.quest_log, &state.content, id) {
                DialogueOutcome::Accepted(id.clone())
            } else {
                DialogueOutcome::Invalid
            }
        }
        Some(DialogueChoice::CompleteQuest(id)) => {
            match quests::turn_in(&mut state.quest_log, &state.content, id) {
                Some(reward) => {
                    quests::apply_reward(
                        &mut state.world,
                        player,
                        &state.content,
                        &reward,
                        &mut state.events,
                    );
                    DialogueOutcome::TurnedIn(id.clone())
                }
                None => DialogueOutcome::Invalid,
            }
        }
        Some(DialogueChoice::BrowseWares) => {
            DialogueOutcome::Wares(state.content.vendor_stock().to_vec())
        }
        Some(DialogueChoice::Converse) => {
            start_dialogue(conversation);
            DialogueOutcome::Conversing
        }
        Some(DialogueChoice::Close) => {
            state.conversation = None;
            DialogueOutcome::Closed
        }
        None => DialogueOutcome::Invalid,
    }
}
