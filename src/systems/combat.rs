//! Combat system functions: damage application and defeat transitions.

use glam::Vec3;
use hecs::{Entity, World};
use log::{debug, info};

use crate::components::{
    AiState, EnemyAi, Health, Lifecycle, Player, PlayerStats, Shield, Spellbook, StatusEffects,
    Target, Transform, Velocity,
};
use crate::config::{CastInterruptPolicy, CombatRules};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::systems::abilities::interrupt_cast;
use crate::systems::resources::mark_in_combat;

/// How a hit split between shield and health
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageReport {
    pub absorbed: f32,
    pub dealt: f32,
    /// The hit took the target to zero health
    pub defeated: bool,
}

/// Consume shield 1:1 first, then health, flooring at zero
pub fn absorb(shield: &mut Shield, health: &mut Health, amount: f32) -> DamageReport {
    let amount = amount.max(0.0);
    let absorbed = amount.min(shield.amount);
    shield.amount -= absorbed;
    let dealt = (amount - absorbed).min(health.current);
    health.current = (health.current - dealt).max(0.0);
    DamageReport {
        absorbed,
        dealt,
        defeated: dealt > 0.0 && health.is_depleted(),
    }
}

/// Apply damage to any combatant. Downed enemies and missing entities are
/// ignored. Enemy defeat and player defeat transitions happen here.
pub fn apply_damage(
    world: &mut World,
    source: Option<Entity>,
    target: Entity,
    amount: f32,
    rules: &CombatRules,
    events: &mut EventQueue,
) -> DamageReport {
    let alive = world
        .get::<&Lifecycle>(target)
        .map(|l| l.is_alive())
        .unwrap_or(true);
    if !alive {
        return DamageReport::default();
    }

    let report = match world.query_one_mut::<(&mut Shield, &mut Health)>(target) {
        Ok((shield, health)) => absorb(shield, health, amount),
        Err(_) => return DamageReport::default(),
    };

    events.push(GameEvent::DamageDealt {
        source,
        target,
        amount: report.dealt,
        absorbed: report.absorbed,
    });

    // Whoever the player is fighting keeps them in combat
    for id in [Some(target), source].into_iter().flatten() {
        if let Ok(mut stats) = world.get::<&mut PlayerStats>(id) {
            mark_in_combat(&mut stats);
        }
    }

    let target_is_player = world.get::<&Player>(target).is_ok();
    if target_is_player {
        if rules.cast_interrupt == CastInterruptPolicy::OnDamage && amount > 0.0 {
            interrupt_cast(world, target, events);
        }
        if report.defeated {
            defeat_player(world, target, events);
        }
    } else {
        provoke(world, target, events);
        if report.defeated {
            defeat_enemy(world, target, rules.respawn_time, events);
        }
    }
    report
}

/// A patrolling enemy that gets hit starts fighting
pub fn provoke(world: &mut World, enemy: Entity, events: &mut EventQueue) {
    if let Ok(mut ai) = world.get::<&mut EnemyAi>(enemy) {
        if ai.state == AiState::Patrol {
            ai.state = AiState::Aggro;
            events.push(GameEvent::AiStateChanged {
                entity: enemy,
                from: AiState::Patrol,
                to: AiState::Aggro,
            });
        }
    }
}

fn defeat_enemy(world: &mut World, enemy: Entity, respawn_time: f32, events: &mut EventQueue) {
    let Ok((transform, ai, lifecycle, velocity, effects)) = world.query_one_mut::<(
        &Transform,
        &mut EnemyAi,
        &mut Lifecycle,
        &mut Velocity,
        &mut StatusEffects,
    )>(enemy) else {
        return;
    };

    *lifecycle = Lifecycle::Down {
        respawn_timer: respawn_time,
    };
    velocity.0 = Vec3::ZERO;
    effects.clear();
    ai.pending_strike = None;
    debug!("{} defeated at {:?}", ai.name, transform.pos);

    events.push(GameEvent::EnemyDefeated {
        entity: enemy,
        kind: ai.kind.clone(),
        position: transform.pos,
        xp: ai.xp,
        loot_table: ai.loot_table.clone(),
    });
}

/// Half health and mana back, a tenth of the gold gone, wake up at camp
fn defeat_player(world: &mut World, player: Entity, events: &mut EventQueue) {
    let Ok((transform, velocity, health, stats, spellbook, target)) = world.query_one_mut::<(
        &mut Transform,
        &mut Velocity,
        &mut Health,
        &mut PlayerStats,
        &mut Spellbook,
        &mut Target,
    )>(player) else {
        return;
    };

    health.current = health.max * DEFEAT_RESTORE_FRACTION;
    stats.mana.current = stats.mana.max * DEFEAT_RESTORE_FRACTION;
    let gold_lost = (stats.gold as f32 * DEFEAT_GOLD_PENALTY).floor() as u32;
    stats.gold -= gold_lost;
    stats.in_combat_timer = 0.0;
    transform.pos = Vec3::from(SAFE_POINT);
    velocity.0 = Vec3::ZERO;
    spellbook.cast = None;
    target.0 = None;

    info!("player defeated, lost {gold_lost} gold");
    events.push(GameEvent::PlayerDefeated { gold_lost });
}
