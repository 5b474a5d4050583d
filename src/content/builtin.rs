//! Builtin content tables - the hand-authored world shipped with the game.

use glam::Vec3;

use crate::collision::Collider;
use crate::components::{Archetype, EquipSlot, InteractKind};
use crate::constants::*;
use crate::spawning::EnemyDef;

use super::defs::*;

// =============================================================================
// ABILITIES
// =============================================================================

pub fn abilities() -> Vec<AbilityDef> {
    vec![
        AbilityDef {
            id: "arcBolt".into(),
            name: "Arc Bolt".into(),
            slot: 1,
            cost: ARC_BOLT_COST,
            cooldown: 0.0,
            cast_time: 0.0,
            range: ARC_BOLT_RANGE,
            requires_target: true,
            effect: AbilityEffect::Bolt {
                damage: ARC_BOLT_DAMAGE,
                delivery: Delivery::Projectile { speed: ARC_BOLT_SPEED },
            },
            description: "Instant spark of arcane force.".into(),
        },
        AbilityDef {
            id: "emberLance".into(),
            name: "Ember Lance".into(),
            slot: 2,
            cost: EMBER_LANCE_COST,
            cooldown: EMBER_LANCE_COOLDOWN,
            cast_time: EMBER_LANCE_CAST,
            range: EMBER_LANCE_RANGE,
            requires_target: true,
            effect: AbilityEffect::Lance {
                damage: EMBER_LANCE_DAMAGE,
                delivery: Delivery::Projectile { speed: EMBER_LANCE_SPEED },
            },
            description: "Focused cast for heavy damage.".into(),
        },
        AbilityDef {
            id: "sigilSnare".into(),
            name: "Sigil Snare".into(),
            slot: 3,
            cost: SIGIL_SNARE_COST,
            cooldown: SIGIL_SNARE_COOLDOWN,
            cast_time: SIGIL_SNARE_CAST,
            range: SIGIL_SNARE_RANGE,
            requires_target: true,
            effect: AbilityEffect::Snare {
                slow: SIGIL_SNARE_SLOW,
                duration: SIGIL_SNARE_DURATION,
            },
            description: "Arcane trap slows the target.".into(),
        },
        AbilityDef {
            id: "wardShell".into(),
            name: "Ward Shell".into(),
            slot: 4,
            cost: WARD_SHELL_COST,
            cooldown: WARD_SHELL_COOLDOWN,
            cast_time: 0.0,
            range: 0.0,
            requires_target: false,
            effect: AbilityEffect::Shield {
                amount: WARD_SHELL_AMOUNT,
                cap: WARD_SHELL_CAP,
            },
            description: "Instant protective shell.".into(),
        },
        AbilityDef {
            id: "novaPulse".into(),
            name: "Nova Pulse".into(),
            slot: 5,
            cost: NOVA_PULSE_COST,
            cooldown: NOVA_PULSE_COOLDOWN,
            cast_time: 0.0,
            range: NOVA_PULSE_RADIUS,
            requires_target: false,
            effect: AbilityEffect::Nova {
                radius: NOVA_PULSE_RADIUS,
                damage: NOVA_PULSE_DAMAGE,
            },
            description: "Short-range burst around you.".into(),
        },
        AbilityDef {
            id: "gloomTether".into(),
            name: "Gloom Tether".into(),
            slot: 6,
            cost: GLOOM_TETHER_COST,
            cooldown: GLOOM_TETHER_COOLDOWN,
            cast_time: GLOOM_TETHER_CAST,
            range: GLOOM_TETHER_RANGE,
            requires_target: true,
            effect: AbilityEffect::Dot {
                damage: GLOOM_TETHER_TICK_DAMAGE,
                interval: GLOOM_TETHER_INTERVAL,
                duration: GLOOM_TETHER_DURATION,
            },
            description: "Lingering damage over time.".into(),
        },
        AbilityDef {
            id: "blinkStep".into(),
            name: "Blink Step".into(),
            slot: 7,
            cost: BLINK_STEP_COST,
            cooldown: BLINK_STEP_COOLDOWN,
            cast_time: 0.0,
            range: 0.0,
            requires_target: false,
            effect: AbilityEffect::Blink { distance: BLINK_STEP_DISTANCE },
            description: "Short teleport to reposition.".into(),
        },
        AbilityDef {
            id: "astralCompanion".into(),
            name: "Astral Companion".into(),
            slot: 8,
            cost: ASTRAL_COMPANION_COST,
            cooldown: ASTRAL_COMPANION_COOLDOWN,
            cast_time: ASTRAL_COMPANION_CAST,
            range: 0.0,
            requires_target: false,
            effect: AbilityEffect::Summon { lifetime: SUMMON_LIFETIME },
            description: "Summon a helper for a time.".into(),
        },
    ]
}

// =============================================================================
// ITEMS
// =============================================================================

fn equipment(id: &str, name: &str, slot: EquipSlot, stats: ItemStats, value: u32) -> ItemDef {
    ItemDef {
        id: id.into(),
        name: name.into(),
        value,
        kind: ItemKind::Equipment { slot, stats },
    }
}

fn plain(id: &str, name: &str, kind: ItemKind, value: u32) -> ItemDef {
    ItemDef {
        id: id.into(),
        name: name.into(),
        value,
        kind,
    }
}

fn loot(id: &str, entries: &[(&str, u32)]) -> LootTable {
    LootTable {
        id: id.into(),
        entries: entries
            .iter()
            .map(|(item, weight)| LootEntry {
                item: (*item).into(),
                weight: *weight,
            })
            .collect(),
    }
}

pub fn item_catalog() -> ItemCatalog {
    ItemCatalog {
        items: vec![
            plain("crystal_dust", "Crystal Dust", ItemKind::Loot, 6),
            plain("tarnished_charm", "Tarnished Charm", ItemKind::Loot, 10),
            plain("relic_shard", "Relic Shard", ItemKind::Quest, 0),
            plain(
                "arcane_tonic",
                "Arcane Tonic",
                ItemKind::Consumable {
                    effect: ConsumableEffect::RestoreMana { amount: ARCANE_TONIC_MANA },
                },
                7,
            ),
            equipment(
                "ashen_staff",
                "Ashen Staff",
                EquipSlot::Staff,
                ItemStats { mana: 8.0, ..Default::default() },
                40,
            ),
            equipment(
                "wayfarer_robe",
                "Wayfarer Robe",
                EquipSlot::Robe,
                ItemStats { hp: 10.0, ..Default::default() },
                35,
            ),
            equipment(
                "focus_ring",
                "Focus Ring",
                EquipSlot::Ring,
                ItemStats { mana_regen: 1.0, ..Default::default() },
                30,
            ),
            equipment(
                "caveward_ring",
                "Caveward Ring",
                EquipSlot::Ring,
                ItemStats { mana: 12.0, ..Default::default() },
                60,
            ),
        ],
        loot_tables: vec![
            loot(
                "common",
                &[("crystal_dust", 1), ("tarnished_charm", 1), ("relic_shard", 1)],
            ),
            loot(
                "elite",
                &[
                    ("crystal_dust", 2),
                    ("tarnished_charm", 3),
                    ("relic_shard", 1),
                    ("arcane_tonic", 1),
                ],
            ),
        ],
        vendor: vec![
            VendorStock { label: "Arcane Tonic".into(), item: "arcane_tonic".into(), price: 15 },
            VendorStock { label: "Luminous Band".into(), item: "focus_ring".into(), price: 40 },
            VendorStock { label: "Nomad's Staff".into(), item: "ashen_staff".into(), price: 50 },
            VendorStock { label: "Wayfarer Robe".into(), item: "wayfarer_robe".into(), price: 35 },
        ],
    }
}

// =============================================================================
// QUESTS
// =============================================================================

fn step(kind: StepKind, target: &str, count: u32) -> QuestStep {
    QuestStep {
        kind,
        target: target.into(),
        count,
    }
}

fn quest(
    id: &str,
    title: &str,
    giver: &str,
    text: &str,
    steps: Vec<QuestStep>,
    reward: Reward,
) -> QuestDef {
    QuestDef {
        id: id.into(),
        title: title.into(),
        giver: giver.into(),
        text: text.into(),
        steps,
        reward,
    }
}

pub fn quests() -> Vec<QuestDef> {
    vec![
        quest(
            "clearWilds",
            "Cull the Stalkers",
            "rysa",
            "Thin the wild stalkers prowling the forest path.",
            vec![step(StepKind::Kill, "stalker", 6)],
            Reward { gold: 25, mana: 8.0, ..Default::default() },
        ),
        quest(
            "recoverRelics",
            "Lost Camp Relics",
            "miro",
            "Recover relic shards scattered near the ruins.",
            vec![step(StepKind::Fetch, "relic_shard", 3)],
            Reward { gold: 30, xp: 80, ..Default::default() },
        ),
        quest(
            "escortScribe",
            "Escort the Scribe",
            "miro",
            "Escort Scribe Ilen to the ruin gate.",
            vec![step(StepKind::Escort, "scribe", 1)],
            Reward { gold: 40, mana: 10.0, ..Default::default() },
        ),
        quest(
            "ritualStones",
            "Ritual Alignment",
            "kato",
            "Activate the ritual stones in the correct order.",
            vec![step(StepKind::Sequence, "Ritual Stone", 3)],
            Reward { gold: 20, xp: 90, ..Default::default() },
        ),
        quest(
            "miniBoss",
            "Break the Brute",
            "kato",
            "Defeat the hulking brute near the cave mouth.",
            vec![step(StepKind::Kill, "brute", 1)],
            Reward {
                gold: 60,
                xp: 120,
                item: Some("caveward_ring".into()),
                ..Default::default()
            },
        ),
        quest(
            "casterHunt",
            "Silence the Casters",
            "rysa",
            "Disrupt the rogue seers at the lake shore.",
            vec![step(StepKind::Kill, "seer", 4)],
            Reward { gold: 35, xp: 70, ..Default::default() },
        ),
        quest(
            "lakeSamples",
            "Lake Residue",
            "nera",
            "Collect residue samples along the lake.",
            vec![step(StepKind::Interact, "Lake Sample", 2)],
            Reward { gold: 25, mana: 6.0, ..Default::default() },
        ),
        quest(
            "hermitNote",
            "Hermit's Note",
            "vale",
            "Deliver the sealed note to the hermit beyond the forest.",
            vec![step(StepKind::Talk, "orra", 1)],
            Reward { gold: 20, xp: 50, ..Default::default() },
        ),
        quest(
            "scoutCave",
            "Eyes on the Cave",
            "kato",
            "Scout the cave gate, then report back.",
            vec![step(StepKind::Reach, "cave_gate", 1), step(StepKind::Talk, "kato", 1)],
            Reward { gold: 15, xp: 40, hp: 4.0, ..Default::default() },
        ),
    ]
}

// =============================================================================
// WORLD LAYOUT
// =============================================================================

fn prop_box(x: f32, z: f32, w: f32, d: f32, h: f32, y: f32) -> Collider {
    Collider::Cuboid {
        center: Vec3::new(x, y, z),
        half_extents: Vec3::new(w / 2.0, h / 2.0, d / 2.0),
    }
}

fn enemy(
    kind: &str,
    name: &str,
    archetype: Archetype,
    health: f32,
    damage: f32,
    speed: f32,
    range: f32,
    aggro: f32,
) -> EnemyDef {
    EnemyDef {
        kind: kind.into(),
        name: name.into(),
        archetype,
        health,
        damage,
        speed,
        range,
        aggro,
        leash: DEFAULT_LEASH,
        xp: DEFAULT_ENEMY_XP,
        loot_table: "common".into(),
    }
}

fn spawn(id: &str, kind: &str, x: f32, y: f32, z: f32) -> SpawnPoint {
    SpawnPoint {
        id: id.into(),
        kind: kind.into(),
        pos: Vec3::new(x, y, z),
    }
}

fn npc(id: &str, name: &str, role: &str, pos: Vec3, line: &str) -> NpcDef {
    NpcDef {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        pos,
        line: line.into(),
        vendor: false,
        escort: None,
        dialogue: None,
    }
}

fn hermit_dialogue() -> DialogueTree {
    DialogueTree {
        nodes: vec![
            DialogueNode {
                text: "Rarely do I speak. But your note... it is familiar.".into(),
                options: vec![
                    DialogueOption {
                        label: "Offer ten gold for his stories".into(),
                        next_node: Some(1),
                        cost: DialogueCost { gold: 10, mana: 0.0 },
                        grant_xp: 0,
                    },
                    DialogueOption {
                        label: "Let him draw on your mana".into(),
                        next_node: Some(2),
                        cost: DialogueCost { gold: 0, mana: 30.0 },
                        grant_xp: 0,
                    },
                    DialogueOption {
                        label: "Leave".into(),
                        next_node: None,
                        cost: DialogueCost::default(),
                        grant_xp: 0,
                    },
                ],
            },
            DialogueNode {
                text: "He recounts the fall of the ruin wardens.".into(),
                options: vec![DialogueOption {
                    label: "Listen closely".into(),
                    next_node: None,
                    cost: DialogueCost::default(),
                    grant_xp: 30,
                }],
            },
            DialogueNode {
                text: "He threads your mana through a sigil and shows you the old paths.".into(),
                options: vec![DialogueOption {
                    label: "Thank him".into(),
                    next_node: None,
                    cost: DialogueCost::default(),
                    grant_xp: 20,
                }],
            },
        ],
    }
}

pub fn world_layout() -> WorldLayout {
    let mut scribe = npc(
        "scribe",
        "Scribe Ilen",
        "Scribe",
        Vec3::new(-52.0, 1.0, 10.0),
        "The ruins whisper. Bring me pieces and I can read them.",
    );
    scribe.escort = Some(EscortDef {
        quest: "escortScribe".into(),
        destination: Vec3::new(72.0, 1.0, 42.0),
    });

    let mut hermit = npc(
        "orra",
        "Hermit Orren",
        "Hermit",
        Vec3::new(20.0, 1.0, 85.0),
        "Rarely do I speak. But your note... it is familiar.",
    );
    hermit.dialogue = Some(hermit_dialogue());

    let mut merchant = npc(
        "merchant",
        "Luma",
        "Merchant",
        Vec3::new(-45.0, 1.0, 12.0),
        "Supplies for the road. Gold for the craft.",
    );
    merchant.vendor = true;

    let mut brute = enemy("brute", "Cave Brute", Archetype::Heavy, 140.0, 12.0, 2.8, 2.8, 16.0);
    brute.xp = 60;
    brute.loot_table = "elite".into();
    let mut guardian = enemy(
        "guardian",
        "Ruin Guardian",
        Archetype::Melee,
        110.0,
        10.0,
        3.2,
        2.4,
        16.0,
    );
    guardian.loot_table = "elite".into();

    WorldLayout {
        props: vec![
            prop_box(-30.0, -10.0, 8.0, 6.0, 3.0, 1.5),
            prop_box(-65.0, 5.0, 6.0, 6.0, 2.5, 1.2),
            prop_box(-55.0, -12.0, 5.0, 5.0, 2.5, 1.2),
            prop_box(-40.0, 12.0, 4.0, 4.0, 2.0, 1.0),
            prop_box(-42.0, -6.0, 2.0, 6.0, 3.0, 1.5),
            prop_box(-60.0, -5.0, 3.0, 7.0, 3.5, 1.7),
            prop_box(10.0, -40.0, 6.0, 6.0, 4.0, 2.0),
            prop_box(25.0, -30.0, 5.0, 5.0, 3.0, 1.5),
            prop_box(20.0, -15.0, 4.0, 7.0, 3.0, 1.5),
            prop_box(60.0, 50.0, 6.0, 12.0, 6.0, 3.0),
            prop_box(80.0, 45.0, 10.0, 6.0, 4.0, 2.0),
            prop_box(70.0, 65.0, 8.0, 8.0, 5.0, 2.5),
            prop_box(0.0, 70.0, 12.0, 8.0, 6.0, 3.0),
            prop_box(-10.0, 65.0, 6.0, 6.0, 4.0, 2.0),
            prop_box(60.0, -80.0, 6.0, 10.0, 2.0, 1.0),
            prop_box(75.0, -90.0, 4.0, 6.0, 2.0, 1.0),
        ],
        scatter: vec![
            ScatterDef { count: 45, min: [-5.0, -90.0], max: [80.0, -15.0], radius: [1.2, 1.2] },
            ScatterDef { count: 35, min: [20.0, 10.0], max: [100.0, 90.0], radius: [1.2, 1.2] },
            ScatterDef { count: 20, min: [-20.0, 40.0], max: [20.0, 90.0], radius: [1.0, 2.2] },
        ],
        zones: vec![
            ZoneDef { name: "Camp".into(), center: Vec3::new(-50.0, 0.0, 0.0), radius: 40.0 },
            ZoneDef { name: "Forest".into(), center: Vec3::new(10.0, 0.0, -20.0), radius: 60.0 },
            ZoneDef { name: "Ruins".into(), center: Vec3::new(70.0, 0.0, 50.0), radius: 45.0 },
            ZoneDef { name: "Cave Gate".into(), center: Vec3::new(0.0, 0.0, 70.0), radius: 35.0 },
            ZoneDef {
                name: "Lake Shore".into(),
                center: Vec3::new(60.0, 0.0, -80.0),
                radius: 45.0,
            },
        ],
        npcs: vec![
            npc(
                "rysa",
                "Rysa",
                "Scout Captain",
                Vec3::new(-55.0, 1.0, 0.0),
                "The wilds are restless. Keep the paths clear and we can all breathe.",
            ),
            npc(
                "miro",
                "Archivist Miro",
                "Historian",
                Vec3::new(-48.0, 1.0, 6.0),
                "The ruins whisper. Bring me pieces and I can read them.",
            ),
            npc(
                "kato",
                "Warden Kato",
                "Guard Captain",
                Vec3::new(-60.0, 1.0, -6.0),
                "We guard the gate. Prove your strength and I'll reward you.",
            ),
            npc(
                "nera",
                "Herbalist Nera",
                "Trainer",
                Vec3::new(-42.0, 1.0, 0.0),
                "Channel your flow. Training starts with curiosity.",
            ),
            npc(
                "vale",
                "Courier Vale",
                "Courier",
                Vec3::new(-50.0, 1.0, -8.0),
                "Messages keep the camp alive. Care to help?",
            ),
            hermit,
            merchant,
            scribe,
        ],
        interactables: vec![
            InteractableDef {
                id: "ritual1".into(),
                name: "Ritual Stone".into(),
                kind: InteractKind::Ritual,
                pos: Vec3::new(55.0, 0.75, 55.0),
                order: 1,
            },
            InteractableDef {
                id: "ritual2".into(),
                name: "Ritual Stone".into(),
                kind: InteractKind::Ritual,
                pos: Vec3::new(68.0, 0.75, 70.0),
                order: 2,
            },
            InteractableDef {
                id: "ritual3".into(),
                name: "Ritual Stone".into(),
                kind: InteractKind::Ritual,
                pos: Vec3::new(85.0, 0.75, 50.0),
                order: 3,
            },
            InteractableDef {
                id: "sample1".into(),
                name: "Lake Sample".into(),
                kind: InteractKind::Sample,
                pos: Vec3::new(55.0, 0.75, -80.0),
                order: 1,
            },
            InteractableDef {
                id: "sample2".into(),
                name: "Lake Sample".into(),
                kind: InteractKind::Sample,
                pos: Vec3::new(75.0, 0.75, -92.0),
                order: 2,
            },
        ],
        waypoints: vec![WaypointDef {
            id: "cave_gate".into(),
            pos: Vec3::new(0.0, 1.0, 58.0),
            radius: 6.0,
        }],
        enemy_types: vec![
            enemy("stalker", "Wild Stalker", Archetype::Melee, 70.0, 7.0, 4.5, 2.2, 14.0),
            enemy("scout", "Razor Scout", Archetype::Skirmisher, 60.0, 6.0, 6.2, 2.0, 12.0),
            enemy("seer", "Rogue Seer", Archetype::Ranged, 65.0, 8.0, 3.5, 14.0, 18.0),
            brute,
            guardian,
            enemy("shade", "Glide Shade", Archetype::Ranged, 55.0, 7.0, 4.0, 10.0, 16.0),
        ],
        spawns: vec![
            spawn("stalker1", "stalker", 0.0, 1.0, -25.0),
            spawn("stalker2", "stalker", 12.0, 1.0, -40.0),
            spawn("scout1", "scout", 35.0, 1.0, -20.0),
            spawn("seer1", "seer", 65.0, 1.0, -70.0),
            spawn("seer2", "seer", 75.0, 1.0, -90.0),
            spawn("brute1", "brute", -5.0, 1.0, 75.0),
            spawn("guardian", "guardian", 70.0, 1.0, 60.0),
            spawn("shade", "shade", 50.0, 2.0, -10.0),
            spawn("seer3", "seer", 58.0, 1.0, -95.0),
        ],
    }
}
