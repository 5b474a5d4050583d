//! NPC conversations.
//!
//! Talking to an NPC opens a top-level menu built from quest state (accept,
//! complete), the vendor flag and whether the NPC has a dialogue tree.
//! Tree navigation works on the `Conversation` directly; options can be gated
//! on gold or mana, which are paid when the option is taken.

use crate::components::PlayerStats;
use crate::content::{ContentDb, DialogueNode, DialogueTree, NpcDef};
use crate::systems::quests::{available_quests, completable_quests, QuestLog};

/// An open conversation with one NPC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub npc: String,
    /// Position in the NPC's dialogue tree; `None` while on the top-level menu
    pub node: Option<usize>,
}

impl Conversation {
    pub fn new(npc: &str) -> Self {
        Self {
            npc: npc.to_string(),
            node: None,
        }
    }
}

/// Top-level menu entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueChoice {
    AcceptQuest(String),
    CompleteQuest(String),
    BrowseWares,
    /// Enter the NPC's dialogue tree
    Converse,
    Close,
}

/// Result of picking a dialogue tree option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionOutcome {
    Continued { node: usize, xp: u32 },
    Ended { xp: u32 },
    /// Gold or mana requirement not met; nothing changed
    CannotAfford,
    Invalid,
}

/// Menu for `npc` given the current quest log
pub fn npc_choices(npc: &NpcDef, content: &ContentDb, log: &QuestLog) -> Vec<DialogueChoice> {
    let mut choices: Vec<DialogueChoice> = completable_quests(log, content, &npc.id)
        .into_iter()
        .map(|q| DialogueChoice::CompleteQuest(q.id.clone()))
        .collect();
    choices.extend(
        available_quests(log, content, &npc.id)
            .into_iter()
            .map(|q| DialogueChoice::AcceptQuest(q.id.clone())),
    );
    if npc.vendor {
        choices.push(DialogueChoice::BrowseWares);
    }
    if npc.dialogue.is_some() {
        choices.push(DialogueChoice::Converse);
    }
    choices.push(DialogueChoice::Close);
    choices
}

/// Get the current dialogue node
pub fn current_node<'a>(
    conversation: &Conversation,
    tree: &'a DialogueTree,
) -> Option<&'a DialogueNode> {
    tree.nodes.get(conversation.node?)
}

/// Take option `index` of the current node, paying its cost
pub fn select_option(
    conversation: &mut Conversation,
    tree: &DialogueTree,
    stats: &mut PlayerStats,
    index: usize,
) -> OptionOutcome {
    let Some(option) = current_node(conversation, tree).and_then(|node| node.options.get(index))
    else {
        return OptionOutcome::Invalid;
    };
    let cost = option.cost;
    if stats.gold < cost.gold || stats.mana.current < cost.mana {
        return OptionOutcome::CannotAfford;
    }
    stats.gold -= cost.gold;
    stats.mana.add(-cost.mana);

    match option.next_node.filter(|&next| next < tree.nodes.len()) {
        Some(next) => {
            conversation.node = Some(next);
            OptionOutcome::Continued {
                node: next,
                xp: option.grant_xp,
            }
        }
        None => {
            reset_dialogue(conversation);
            OptionOutcome::Ended { xp: option.grant_xp }
        }
    }
}

/// Enter the tree at its first node
pub fn start_dialogue(conversation: &mut Conversation) {
    conversation.node = Some(0);
}

/// Back to the top-level menu
pub fn reset_dialogue(conversation: &mut Conversation) {
    conversation.node = None;
}
