//! Ability casting: validation, the casting state machine and effect resolution.
//!
//! A successful attempt pays mana up front, starts the global and per-ability
//! cooldowns, and either resolves at once (cast time 0) or parks a `Cast` on
//! the spellbook that `update_casting` resolves exactly once.

use glam::Vec3;
use hecs::{Entity, World};
use log::debug;

use crate::collision::{flat, flat_distance, is_blocked, Arena};
use crate::components::{
    Cast, Dot, PlayerStats, Projectile, Shield, Slow, Spellbook, StatusEffects, Summon, Target,
    Transform,
};
use crate::config::CombatRules;
use crate::constants::*;
use crate::content::{AbilityDef, AbilityEffect, Delivery};
use crate::events::{EventQueue, GameEvent};
use crate::queries;
use crate::spawning::spawn_summon;
use crate::systems::combat::{apply_damage, provoke};
use crate::systems::resources::{add_fatigue, mark_in_combat, spend_mana};

/// Why an attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Caster has no spellbook
    NotReady,
    GlobalCooldown,
    AlreadyCasting,
    OnCooldown,
    NotEnoughMana,
    NoTarget,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// Instant ability resolved
    Cast,
    /// Cast bar started
    Started,
    Rejected(RejectReason),
}

fn validate(
    world: &World,
    caster: Entity,
    ability: &AbilityDef,
) -> Result<Option<Entity>, RejectReason> {
    let spellbook = world
        .get::<&Spellbook>(caster)
        .map_err(|_| RejectReason::NotReady)?;
    if spellbook.global_cooldown > 0.0 {
        return Err(RejectReason::GlobalCooldown);
    }
    if spellbook.is_casting() {
        return Err(RejectReason::AlreadyCasting);
    }
    if spellbook.cooldown(&ability.id) > 0.0 {
        return Err(RejectReason::OnCooldown);
    }

    let mana = world
        .get::<&PlayerStats>(caster)
        .map(|s| s.mana.current)
        .unwrap_or(0.0);
    if mana < ability.cost {
        return Err(RejectReason::NotEnoughMana);
    }

    let target = world.get::<&Target>(caster).ok().and_then(|t| t.0);
    if !ability.requires_target {
        return Ok(target);
    }
    let target = target
        .filter(|&t| queries::is_live_enemy(world, t))
        .ok_or(RejectReason::NoTarget)?;
    let (Some(from), Some(to)) = (
        queries::position(world, caster),
        queries::position(world, target),
    ) else {
        return Err(RejectReason::NoTarget);
    };
    if flat_distance(from, to) > ability.range {
        return Err(RejectReason::OutOfRange);
    }
    Ok(Some(target))
}

/// Try to cast `ability`. Rejections change nothing.
pub fn attempt_cast(
    world: &mut World,
    caster: Entity,
    ability: &AbilityDef,
    arena: &Arena,
    rules: &CombatRules,
    events: &mut EventQueue,
) -> CastOutcome {
    let target = match validate(world, caster, ability) {
        Ok(target) => target,
        Err(reason) => {
            debug!("{} rejected: {reason:?}", ability.id);
            return CastOutcome::Rejected(reason);
        }
    };

    if let Ok((stats, spellbook)) =
        world.query_one_mut::<(&mut PlayerStats, &mut Spellbook)>(caster)
    {
        spend_mana(stats, ability.cost);
        add_fatigue(stats, CAST_FATIGUE);
        mark_in_combat(stats);
        spellbook.global_cooldown = GLOBAL_COOLDOWN;
        spellbook.cooldowns.insert(ability.id.clone(), ability.cooldown);
        if ability.cast_time > 0.0 {
            spellbook.cast = Some(Cast {
                ability: ability.clone(),
                target,
                remaining: ability.cast_time,
            });
        }
    }

    debug!("casting {}", ability.id);
    events.push(GameEvent::AbilityCast {
        ability: ability.id.clone(),
    });

    if ability.cast_time > 0.0 {
        return CastOutcome::Started;
    }
    resolve_effect(world, caster, ability, target, arena, rules, events);
    CastOutcome::Cast
}

/// Tick every cooldown toward zero
pub fn update_cooldowns(spellbook: &mut Spellbook, dt: f32) {
    spellbook.global_cooldown = (spellbook.global_cooldown - dt).max(0.0);
    for remaining in spellbook.cooldowns.values_mut() {
        *remaining = (*remaining - dt).max(0.0);
    }
    spellbook.cooldowns.retain(|_, remaining| *remaining > 0.0);
}

/// Advance the active cast; resolve it once when the bar fills
pub fn update_casting(
    world: &mut World,
    caster: Entity,
    arena: &Arena,
    rules: &CombatRules,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();
    let finished = {
        let Ok(mut spellbook) = world.get::<&mut Spellbook>(caster) else {
            return;
        };
        let Some(cast) = spellbook.cast.as_mut() else {
            return;
        };
        cast.remaining -= dt;
        if cast.remaining > 0.0 {
            return;
        }
        spellbook.cast.take()
    };

    if let Some(cast) = finished {
        if cast.ability.requires_target
            && !cast.target.is_some_and(|t| queries::is_live_enemy(world, t))
        {
            debug!("{} fizzled, target lost", cast.ability.id);
            return;
        }
        resolve_effect(world, caster, &cast.ability, cast.target, arena, rules, events);
    }
}

/// Cancel the active cast. Mana and cooldowns are not refunded.
pub fn interrupt_cast(world: &mut World, caster: Entity, events: &mut EventQueue) {
    let cancelled = world
        .get::<&mut Spellbook>(caster)
        .ok()
        .and_then(|mut spellbook| spellbook.cast.take());
    if let Some(cast) = cancelled {
        debug!("{} interrupted", cast.ability.id);
        events.push(GameEvent::CastInterrupted {
            ability: cast.ability.id,
        });
    }
}

/// Carry out an ability's effect
pub fn resolve_effect(
    world: &mut World,
    caster: Entity,
    ability: &AbilityDef,
    target: Option<Entity>,
    arena: &Arena,
    rules: &CombatRules,
    events: &mut EventQueue,
) {
    let Some(origin) = world.get::<&Transform>(caster).ok().map(|t| *t) else {
        return;
    };
    let spell_power = world
        .get::<&PlayerStats>(caster)
        .map(|s| s.spell_power)
        .unwrap_or(1.0);

    match ability.effect {
        AbilityEffect::Bolt { damage, delivery } | AbilityEffect::Lance { damage, delivery } => {
            let Some(target) = target else { return };
            let damage = damage * spell_power;
            match delivery {
                Delivery::Instant => {
                    apply_damage(world, Some(caster), target, damage, rules, events);
                }
                Delivery::Projectile { speed } => {
                    let Some(to) = queries::position(world, target) else { return };
                    launch_projectile(
                        world,
                        Some(caster),
                        origin.pos,
                        target,
                        to,
                        speed,
                        damage,
                        true,
                    );
                }
            }
        }
        AbilityEffect::Snare { slow, duration } => {
            let Some(target) = target else { return };
            if let Ok(mut effects) = world.get::<&mut StatusEffects>(target) {
                effects.slow = Some(Slow {
                    factor: slow.clamp(0.0, MAX_SLOW),
                    remaining: duration,
                });
            }
            provoke(world, target, events);
        }
        AbilityEffect::Dot {
            damage,
            interval,
            duration,
        } => {
            let Some(target) = target else { return };
            if let Ok(mut effects) = world.get::<&mut StatusEffects>(target) {
                effects.dot = Some(Dot {
                    damage: damage * spell_power,
                    interval,
                    tick_timer: interval,
                    remaining: duration,
                    source: Some(caster),
                });
            }
            provoke(world, target, events);
        }
        AbilityEffect::Shield { amount, cap } => {
            if let Ok(mut shield) = world.get::<&mut Shield>(caster) {
                shield.amount = (shield.amount + amount).min(cap);
            }
        }
        AbilityEffect::Nova { radius, damage } => {
            let hit: Vec<Entity> = queries::enemies_within(world, origin.pos, radius)
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            for enemy in hit {
                apply_damage(world, Some(caster), enemy, damage * spell_power, rules, events);
            }
        }
        AbilityEffect::Blink { distance } => {
            let destination = origin.pos + origin.forward() * distance;
            if is_blocked(destination, PLAYER_RADIUS, arena) {
                debug!("blink destination blocked");
                return;
            }
            if let Ok(mut transform) = world.get::<&mut Transform>(caster) {
                transform.pos = destination;
            }
        }
        AbilityEffect::Summon { lifetime } => {
            let previous: Vec<Entity> = world
                .query::<&Summon>()
                .iter()
                .filter(|(_, summon)| summon.owner == caster)
                .map(|(id, _)| id)
                .collect();
            for id in previous {
                let _ = world.despawn(id);
            }
            let pos = origin.pos + origin.right() * 1.5;
            spawn_summon(world, caster, pos, lifetime);
        }
    }
}

/// Spawn a projectile flying from `from` toward `to`
#[allow(clippy::too_many_arguments)]
pub fn launch_projectile(
    world: &mut World,
    source: Option<Entity>,
    from: Vec3,
    target: Entity,
    to: Vec3,
    speed: f32,
    damage: f32,
    homing: bool,
) -> Entity {
    let dir = flat(to - from).normalize_or_zero();
    world.spawn((
        Transform::at(from),
        Projectile {
            source,
            target,
            velocity: dir * speed,
            damage,
            life: PROJECTILE_LIFETIME,
            homing,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        AiState, Archetype, Body, EnemyAi, Equipment, Health, Inventory, Lifecycle, Player,
        Velocity,
    };
    use approx::assert_relative_eq;

    fn spawn_player(world: &mut World) -> Entity {
        world.spawn((
            Player,
            Transform::at(Vec3::new(0.0, 1.0, 0.0)),
            Velocity::default(),
            Body { radius: PLAYER_RADIUS },
            Health::new(PLAYER_BASE_HEALTH),
            Shield::default(),
            PlayerStats::new(),
            Spellbook::default(),
            Target::default(),
            Inventory::new(),
            Equipment::default(),
        ))
    }

    fn spawn_enemy(world: &mut World, pos: Vec3) -> Entity {
        world.spawn((
            Transform::at(pos),
            Velocity::default(),
            Health::new(70.0),
            Shield::default(),
            StatusEffects::default(),
            Lifecycle::Alive,
            EnemyAi {
                kind: "stalker".into(),
                name: "Wild Stalker".into(),
                archetype: Archetype::Melee,
                state: AiState::Patrol,
                home: pos,
                patrol: vec![pos],
                patrol_index: 0,
                aggro_radius: 14.0,
                leash: 25.0,
                range: 2.2,
                kite_range: 0.0,
                damage: 7.0,
                speed: 4.5,
                attack_timer: 0.0,
                attack_interval: 1.6,
                pending_strike: None,
                xp: 25,
                loot_table: "common".into(),
            },
        ))
    }

    fn instant_snipe() -> AbilityDef {
        AbilityDef {
            id: "snipe".into(),
            name: "Snipe".into(),
            slot: 1,
            cost: 18.0,
            cooldown: 8.0,
            cast_time: 0.0,
            range: 18.0,
            requires_target: true,
            effect: AbilityEffect::Bolt {
                damage: 22.0,
                delivery: Delivery::Instant,
            },
            description: String::new(),
        }
    }

    struct Fixture {
        world: World,
        player: Entity,
        enemy: Entity,
        arena: Arena,
        events: EventQueue,
        rules: CombatRules,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let player = spawn_player(&mut world);
        let enemy = spawn_enemy(&mut world, Vec3::new(0.0, 1.0, 10.0));
        world.get::<&mut Target>(player).unwrap().0 = Some(enemy);
        Fixture {
            world,
            player,
            enemy,
            arena: Arena::default(),
            events: EventQueue::new(),
            rules: CombatRules::default(),
        }
    }

    impl Fixture {
        fn cast(&mut self, ability: &AbilityDef) -> CastOutcome {
            attempt_cast(
                &mut self.world,
                self.player,
                ability,
                &self.arena,
                &self.rules,
                &mut self.events,
            )
        }

        fn resolve(&mut self, ability: &AbilityDef) {
            resolve_effect(
                &mut self.world,
                self.player,
                ability,
                Some(self.enemy),
                &self.arena,
                &self.rules,
                &mut self.events,
            );
        }
    }

    #[test]
    fn test_instant_targeted_cast_end_to_end() {
        let mut f = fixture();
        f.world.get::<&mut PlayerStats>(f.player).unwrap().mana.current = 20.0;

        assert_eq!(f.cast(&instant_snipe()), CastOutcome::Cast);

        assert_relative_eq!(f.world.get::<&PlayerStats>(f.player).unwrap().mana.current, 2.0);
        assert_eq!(f.world.get::<&Spellbook>(f.player).unwrap().cooldown("snipe"), 8.0);
        assert_relative_eq!(f.world.get::<&Health>(f.enemy).unwrap().current, 70.0 - 22.0);
    }

    #[test]
    fn test_rejections_change_nothing() {
        let mut f = fixture();
        f.world.get::<&mut PlayerStats>(f.player).unwrap().mana.current = 10.0;
        assert_eq!(
            f.cast(&instant_snipe()),
            CastOutcome::Rejected(RejectReason::NotEnoughMana)
        );
        assert_eq!(f.world.get::<&PlayerStats>(f.player).unwrap().mana.current, 10.0);

        f.world.get::<&mut PlayerStats>(f.player).unwrap().mana.current = 100.0;
        f.world.get::<&mut Transform>(f.enemy).unwrap().pos = Vec3::new(0.0, 1.0, 40.0);
        assert_eq!(f.cast(&instant_snipe()), CastOutcome::Rejected(RejectReason::OutOfRange));

        f.world.get::<&mut Target>(f.player).unwrap().0 = None;
        assert_eq!(f.cast(&instant_snipe()), CastOutcome::Rejected(RejectReason::NoTarget));
        assert_eq!(f.world.get::<&Spellbook>(f.player).unwrap().global_cooldown, 0.0);
    }

    #[test]
    fn test_global_and_own_cooldown_block() {
        let mut f = fixture();
        assert_eq!(f.cast(&instant_snipe()), CastOutcome::Cast);
        assert_eq!(
            f.cast(&instant_snipe()),
            CastOutcome::Rejected(RejectReason::GlobalCooldown)
        );
        {
            let mut spellbook = f.world.get::<&mut Spellbook>(f.player).unwrap();
            update_cooldowns(&mut spellbook, GLOBAL_COOLDOWN);
        }
        assert_eq!(f.cast(&instant_snipe()), CastOutcome::Rejected(RejectReason::OnCooldown));
    }

    #[test]
    fn test_cooldowns_non_increasing() {
        let mut spellbook = Spellbook::default();
        spellbook.cooldowns.insert("emberLance".into(), 4.0);
        spellbook.global_cooldown = GLOBAL_COOLDOWN;
        let mut last = spellbook.cooldown("emberLance");
        for _ in 0..100 {
            update_cooldowns(&mut spellbook, 0.05);
            let now = spellbook.cooldown("emberLance");
            assert!(now <= last && now >= 0.0);
            last = now;
        }
        assert_eq!(last, 0.0);
        assert_eq!(spellbook.global_cooldown, 0.0);
    }

    #[test]
    fn test_cast_time_resolves_once() {
        let mut f = fixture();
        let mut lance = instant_snipe();
        lance.cast_time = 1.0;
        assert_eq!(f.cast(&lance), CastOutcome::Started);
        // Mana is paid at cast start
        assert_relative_eq!(f.world.get::<&PlayerStats>(f.player).unwrap().mana.current, 82.0);
        assert_eq!(f.cast(&lance), CastOutcome::Rejected(RejectReason::GlobalCooldown));

        for _ in 0..30 {
            update_casting(&mut f.world, f.player, &f.arena, &f.rules, &mut f.events, 0.1);
        }
        assert_relative_eq!(f.world.get::<&Health>(f.enemy).unwrap().current, 48.0);
        assert!(!f.world.get::<&Spellbook>(f.player).unwrap().is_casting());
    }

    #[test]
    fn test_cast_fizzles_when_target_dies() {
        let mut f = fixture();
        let mut lance = instant_snipe();
        lance.cast_time = 0.5;
        f.cast(&lance);
        *f.world.get::<&mut Lifecycle>(f.enemy).unwrap() = Lifecycle::Down { respawn_timer: 5.0 };
        update_casting(&mut f.world, f.player, &f.arena, &f.rules, &mut f.events, 1.0);
        assert_eq!(f.world.get::<&Health>(f.enemy).unwrap().current, 70.0);
    }

    #[test]
    fn test_interrupt_cancels_cast() {
        let mut f = fixture();
        let mut lance = instant_snipe();
        lance.cast_time = 1.0;
        f.cast(&lance);
        interrupt_cast(&mut f.world, f.player, &mut f.events);
        assert!(!f.world.get::<&Spellbook>(f.player).unwrap().is_casting());
        assert!(f
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::CastInterrupted { ability } if ability == "snipe")));
    }

    #[test]
    fn test_shield_caps() {
        let mut f = fixture();
        let ward = AbilityDef {
            id: "ward".into(),
            name: "Ward".into(),
            slot: 4,
            cost: 0.0,
            cooldown: 0.0,
            cast_time: 0.0,
            range: 0.0,
            requires_target: false,
            effect: AbilityEffect::Shield {
                amount: WARD_SHELL_AMOUNT,
                cap: WARD_SHELL_CAP,
            },
            description: String::new(),
        };
        for _ in 0..3 {
            resolve_effect(&mut f.world, f.player, &ward, None, &f.arena, &f.rules, &mut f.events);
        }
        assert_eq!(f.world.get::<&Shield>(f.player).unwrap().amount, WARD_SHELL_CAP);
    }

    #[test]
    fn test_nova_hits_only_nearby() {
        let mut f = fixture();
        let near = spawn_enemy(&mut f.world, Vec3::new(3.0, 1.0, 0.0));
        let nova = AbilityDef {
            id: "nova".into(),
            name: "Nova".into(),
            slot: 5,
            cost: 0.0,
            cooldown: 0.0,
            cast_time: 0.0,
            range: 6.0,
            requires_target: false,
            effect: AbilityEffect::Nova { radius: 6.0, damage: 20.0 },
            description: String::new(),
        };
        resolve_effect(&mut f.world, f.player, &nova, None, &f.arena, &f.rules, &mut f.events);
        assert_eq!(f.world.get::<&Health>(near).unwrap().current, 50.0);
        assert_eq!(f.world.get::<&Health>(f.enemy).unwrap().current, 70.0);
    }

    #[test]
    fn test_blink_only_when_clear() {
        let mut f = fixture();
        let blink = AbilityDef {
            id: "blink".into(),
            name: "Blink".into(),
            slot: 7,
            cost: 0.0,
            cooldown: 0.0,
            cast_time: 0.0,
            range: 0.0,
            requires_target: false,
            effect: AbilityEffect::Blink { distance: 6.0 },
            description: String::new(),
        };
        resolve_effect(&mut f.world, f.player, &blink, None, &f.arena, &f.rules, &mut f.events);
        assert_relative_eq!(f.world.get::<&Transform>(f.player).unwrap().pos.z, 6.0);

        f.arena.push(crate::collision::Collider::Sphere {
            center: Vec3::new(0.0, 1.0, 12.0),
            radius: 2.0,
        });
        resolve_effect(&mut f.world, f.player, &blink, None, &f.arena, &f.rules, &mut f.events);
        assert_relative_eq!(f.world.get::<&Transform>(f.player).unwrap().pos.z, 6.0);
    }

    #[test]
    fn test_snare_and_dot_apply_status() {
        let mut f = fixture();
        let mut snare = instant_snipe();
        snare.effect = AbilityEffect::Snare { slow: 0.5, duration: 4.0 };
        f.resolve(&snare);
        let mut tether = instant_snipe();
        tether.effect = AbilityEffect::Dot { damage: 4.0, interval: 1.0, duration: 6.0 };
        f.resolve(&tether);

        let effects = *f.world.get::<&StatusEffects>(f.enemy).unwrap();
        assert_eq!(effects.slow, Some(Slow { factor: 0.5, remaining: 4.0 }));
        assert_eq!(effects.dot.map(|d| d.remaining), Some(6.0));
        let ai = f.world.get::<&crate::components::EnemyAi>(f.enemy).unwrap();
        assert_eq!(ai.state, AiState::Aggro);
    }

    #[test]
    fn test_projectile_delivery_spawns_homing_bolt() {
        let mut f = fixture();
        let mut bolt = instant_snipe();
        bolt.effect = AbilityEffect::Bolt {
            damage: 22.0,
            delivery: Delivery::Projectile { speed: 18.0 },
        };
        f.resolve(&bolt);
        let projectiles: Vec<Projectile> =
            f.world.query::<&Projectile>().iter().map(|(_, p)| *p).collect();
        assert_eq!(projectiles.len(), 1);
        assert!(projectiles[0].homing);
        assert_relative_eq!(projectiles[0].velocity.z, 18.0);
        // Damage waits for the projectile to connect
        assert_eq!(f.world.get::<&Health>(f.enemy).unwrap().current, 70.0);
    }

    #[test]
    fn test_summon_replaces_previous() {
        let mut f = fixture();
        let mut companion = instant_snipe();
        companion.requires_target = false;
        companion.effect = AbilityEffect::Summon { lifetime: SUMMON_LIFETIME };
        resolve_effect(&mut f.world, f.player, &companion, None, &f.arena, &f.rules, &mut f.events);
        resolve_effect(&mut f.world, f.player, &companion, None, &f.arena, &f.rules, &mut f.events);
        assert_eq!(f.world.query::<&Summon>().iter().count(), 1);
    }
}
