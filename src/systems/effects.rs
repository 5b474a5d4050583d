//! Status effect ticking.
//!
//! Slows and damage-over-time run on their own timers, independent of the
//! AI state of the entity carrying them.

use hecs::{Entity, World};

use crate::components::{Dot, Lifecycle, StatusEffects};
use crate::config::CombatRules;
use crate::events::EventQueue;
use crate::systems::combat::apply_damage;

// =============================================================================
// PURE STATUS EFFECT FUNCTIONS (operate on component data)
// =============================================================================

/// Advance a dot by `dt`, returning the damage of any tick that fired.
/// Returns the updated dot, or `None` once it expires.
pub fn tick_dot(mut dot: Dot, dt: f32) -> (Option<Dot>, f32) {
    let mut damage = 0.0;
    dot.tick_timer -= dt;
    while dot.tick_timer <= 0.0 && dot.interval > 0.0 {
        damage += dot.damage;
        dot.tick_timer += dot.interval;
    }
    dot.remaining -= dt;
    if dot.remaining <= 0.0 {
        return (None, damage);
    }
    (Some(dot), damage)
}

/// Advance every timer on one entity. Returns dot damage to apply and its source.
pub fn tick_effects(effects: &mut StatusEffects, dt: f32) -> Option<(f32, Option<Entity>)> {
    if let Some(mut slow) = effects.slow {
        slow.remaining -= dt;
        effects.slow = (slow.remaining > 0.0).then_some(slow);
    }

    let dot = effects.dot?;
    let (next, damage) = tick_dot(dot, dt);
    effects.dot = next;
    (damage > 0.0).then_some((damage, dot.source))
}

// =============================================================================
// WORLD SYSTEM
// =============================================================================

/// Tick status effects on every live entity, applying dot damage
pub fn tick_status_effects(
    world: &mut World,
    rules: &CombatRules,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();
    let mut hits = Vec::new();
    for (id, (effects, lifecycle)) in
        world.query_mut::<(&mut StatusEffects, Option<&Lifecycle>)>()
    {
        if lifecycle.is_some_and(|l| !l.is_alive()) {
            continue;
        }
        if let Some((damage, source)) = tick_effects(effects, dt) {
            hits.push((id, damage, source));
        }
    }

    for (target, damage, source) in hits {
        apply_damage(world, source, target, damage, rules, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Shield, Slow};

    #[test]
    fn test_dot_ticks_until_expiry() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = world.spawn((
            Health::new(70.0),
            Shield::default(),
            Lifecycle::Alive,
            StatusEffects {
                slow: None,
                dot: Some(Dot {
                    damage: 4.0,
                    interval: 1.0,
                    tick_timer: 1.0,
                    remaining: 3.0,
                    source: None,
                }),
            },
        ));

        for _ in 0..10 {
            tick_status_effects(&mut world, &CombatRules::default(), &mut events, 0.5);
        }
        assert_eq!(world.get::<&Health>(target).unwrap().current, 70.0 - 12.0);
        assert!(world.get::<&StatusEffects>(target).unwrap().dot.is_none());
    }

    #[test]
    fn test_slow_expires() {
        let mut effects = StatusEffects {
            slow: Some(Slow { factor: 0.5, remaining: 1.0 }),
            dot: None,
        };
        assert!(tick_effects(&mut effects, 0.6).is_none());
        assert_eq!(effects.speed_multiplier(), 0.5);
        tick_effects(&mut effects, 0.6);
        assert!(effects.slow.is_none());
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_downed_entities_do_not_tick() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let dot = Dot {
            damage: 4.0,
            interval: 1.0,
            tick_timer: 0.1,
            remaining: 3.0,
            source: None,
        };
        let target = world.spawn((
            Health::new(70.0),
            Shield::default(),
            Lifecycle::Down { respawn_timer: 10.0 },
            StatusEffects { slow: None, dot: Some(dot) },
        ));
        tick_status_effects(&mut world, &CombatRules::default(), &mut events, 0.5);
        assert_eq!(world.get::<&Health>(target).unwrap().current, 70.0);
    }
}
