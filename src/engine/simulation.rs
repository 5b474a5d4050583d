//! Game simulation - the fixed tick order and end-of-tick event processing.

use log::warn;

use crate::components::{PlayerStats, Spellbook};
use crate::content::StepKind;
use crate::error::{SaveError, SimError};
use crate::events::GameEvent;
use crate::input::MoveInput;
use crate::save;
use crate::systems::{
    abilities, ai, effects, experience, interact, loot, movement, projectile, quests, resources,
    summons, targeting,
};
use crate::time_system::clamp_dt;

use super::GameState;

/// Fail fast when the player lost a component the tick depends on
fn check_player(state: &GameState) -> Result<(), SimError> {
    let world = &state.world;
    let player = state.player;
    if !world.contains(player) {
        return Err(SimError::MissingPlayer("entity"));
    }
    if world.get::<&PlayerStats>(player).is_err() {
        return Err(SimError::MissingPlayer("PlayerStats"));
    }
    if world.get::<&Spellbook>(player).is_err() {
        return Err(SimError::MissingPlayer("Spellbook"));
    }
    Ok(())
}

/// Advance the simulation by one frame. Returns the events the tick produced.
pub fn tick(state: &mut GameState, input: MoveInput, dt: f32) -> Result<Vec<GameEvent>, SimError> {
    puffin::profile_function!();
    check_player(state)?;
    let dt = clamp_dt(dt, state.config.max_dt);
    state.clock.advance(dt);

    let player = state.player;
    movement::update_player_movement(&mut state.world, player, input, &state.arena, dt);
    loot::pickup_loot(&mut state.world, player, &state.content, &mut state.events);

    if let Ok(mut spellbook) = state.world.get::<&mut Spellbook>(player) {
        abilities::update_cooldowns(&mut spellbook, dt);
    }
    abilities::update_casting(
        &mut state.world,
        player,
        &state.arena,
        &state.rules,
        &mut state.events,
        dt,
    );
    if let Ok(mut stats) = state.world.get::<&mut PlayerStats>(player) {
        resources::regenerate(&mut stats, dt);
    }

    effects::tick_status_effects(&mut state.world, &state.rules, &mut state.events, dt);
    ai::update_respawns(&mut state.world, &mut state.events, dt);
    ai::update_enemies(
        &mut state.world,
        player,
        &state.arena,
        &state.rules,
        state.config.group_pull,
        &mut state.events,
        dt,
    );

    interact::update_escort(&mut state.world, player, &state.quest_log, &mut state.events, dt);
    interact::check_reach(
        &state.world,
        player,
        &state.content,
        &state.quest_log,
        &mut state.events,
    );

    projectile::update_projectiles(&mut state.world, &state.rules, &mut state.events, dt);
    summons::update_summons(&mut state.world, &state.arena, dt);
    loot::expire_loot(&mut state.world, dt);
    targeting::clear_stale_target(&mut state.world, player);

    let processed = process_events(state);

    if state.save_timer.tick(dt) {
        autosave(state);
    }
    Ok(processed)
}

/// Drain the queue, feeding quests, experience and loot drops. Handlers may
/// push follow-up events (level ups, quest completions); those are drained
/// in the same call. Returns everything that was processed, in order.
pub fn process_events(state: &mut GameState) -> Vec<GameEvent> {
    puffin::profile_function!();
    let GameState {
        world,
        player,
        content,
        quest_log,
        rng,
        events,
        ..
    } = state;
    let player = *player;

    let mut processed = Vec::new();
    while !events.is_empty() {
        let batch: Vec<GameEvent> = events.drain().collect();
        for event in batch {
            let completed = match &event {
                GameEvent::EnemyDefeated {
                    kind,
                    position,
                    xp,
                    loot_table,
                    ..
                } => {
                    experience::award_xp(world, player, content, *xp, events);
                    loot::drop_loot(world, content, loot_table, *position, rng);
                    quests::record_event(quest_log, content, StepKind::Kill, kind, 1)
                }
                GameEvent::QuestProgress {
                    kind,
                    target,
                    amount,
                } => quests::record_event(quest_log, content, *kind, target, *amount),
                GameEvent::RitualActivated { name, order } => {
                    quests::record_sequence(quest_log, content, name, *order)
                }
                _ => Vec::new(),
            };
            for quest in completed {
                events.push(GameEvent::QuestCompleted { quest });
            }
            processed.push(event);
        }
    }
    processed
}

/// Write the save blob now. `Ok(false)` when no save path is configured.
pub fn save_now(state: &GameState) -> Result<bool, SaveError> {
    let Some(path) = state.config.save_path.as_deref() else {
        return Ok(false);
    };
    let data = save::snapshot(&state.world, state.player, &state.quest_log)?;
    save::write_save(path, &data)?;
    Ok(true)
}

/// Periodic save; failures are logged and the simulation keeps running
pub fn autosave(state: &GameState) -> bool {
    match save_now(state) {
        Ok(written) => written,
        Err(err) => {
            warn!("autosave failed: {err}");
            false
        }
    }
}
