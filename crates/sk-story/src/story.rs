//! The story engine: passage transitions and the state they publish.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sk_core::{Character, Inventory, Item, Passage, Shop, ShopEntry, Stat, StoryConfig, StoryData, inventory};
use sk_script::Value;
use tracing::{debug, info, warn};

use crate::choice::{Choice, ChoiceId, ChoiceKind};
use crate::error::{ErrorKind, StoryError, StoryResult};
use crate::link;
use crate::markdown;
use crate::scope::{Scope, Stage};

/// Consecutive `story.show(...)` redirects allowed within one transition.
pub const MAX_REDIRECTS: usize = 16;

/// Name of the passage reached through the death choice when the story does
/// not configure its own.
pub const FINAL_PASSAGE: &str = "Final passage";

fn final_passage() -> Passage {
    Passage::new(u32::MAX, FINAL_PASSAGE, "[Insert thanks]")
        .with_tag("theme-red")
        .with_tag("button-red")
}

/// A slot in one of the inventories the player can rearrange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    /// A slot of the character's inventory.
    Character(usize),
    /// A slot of the current passage's loot.
    Loot(usize),
}

/// A running story.
///
/// The story owns the authored passages and the session state. Everything a
/// presentation layer reads (current passage, rendered text, choices, loot,
/// shop, error, finished) is replaced as a whole by each successful
/// transition. A failed transition only sets [`Story::error`].
#[derive(Debug)]
pub struct Story {
    name: String,
    config: StoryConfig,
    passages: Vec<Rc<Passage>>,
    by_name: HashMap<String, Rc<Passage>>,
    items: Vec<Rc<Item>>,
    stats: Vec<Rc<Stat>>,
    start: Rc<Passage>,
    final_passage: Rc<Passage>,

    character: Character,
    vars: BTreeMap<String, Value>,
    rng: StdRng,
    history: Vec<Rc<Passage>>,
    current: Option<Rc<Passage>>,
    rendered_text: String,
    choices: Vec<Choice>,
    generation: u64,
    loot: Option<Inventory>,
    shop: Option<Shop>,
    error: Option<(ErrorKind, String)>,
    finished: bool,
}

/// Everything a successful transition publishes.
struct Transition {
    passage: Rc<Passage>,
    stage: Stage,
    rendered_text: String,
    choices: Vec<Choice>,
    link_error: Option<String>,
    kind: ChoiceKind,
}

impl Story {
    /// Build a story from decoded story data. The story is not started.
    pub fn new(data: StoryData) -> StoryResult<Self> {
        data.validate()?;
        let start_pid = data.start_passage().map(|p| p.pid).ok_or(StoryError::EmptyStory)?;

        let StoryData {
            name,
            config,
            passages,
            ..
        } = data;

        let passages: Vec<Rc<Passage>> = passages.into_iter().map(Rc::new).collect();
        let by_name: HashMap<String, Rc<Passage>> = passages
            .iter()
            .map(|p| (p.name.clone(), Rc::clone(p)))
            .collect();
        let start = passages
            .iter()
            .find(|p| p.pid == start_pid)
            .cloned()
            .ok_or(StoryError::UnknownPassage(start_pid))?;
        let final_passage = match &config.death_passage {
            Some(name) => by_name
                .get(name)
                .cloned()
                .ok_or_else(|| StoryError::PassageNotFound(name.clone()))?,
            None => Rc::new(final_passage()),
        };

        Ok(Self {
            name,
            items: config.items.iter().cloned().map(Rc::new).collect(),
            stats: config.stats.iter().cloned().map(Rc::new).collect(),
            character: Character::new(&config),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            passages,
            by_name,
            start,
            final_passage,
            vars: BTreeMap::new(),
            history: Vec::new(),
            current: None,
            rendered_text: String::new(),
            choices: Vec::new(),
            generation: 0,
            loot: None,
            shop: None,
            error: None,
            finished: false,
        })
    }

    /// Decode and build a story from JSON.
    pub fn from_json(source: &str) -> StoryResult<Self> {
        Self::new(StoryData::from_json(source)?)
    }

    /// Start, or restart, the story from its first passage.
    ///
    /// The character is rebuilt from the stat catalog, and the history,
    /// error, finished flag, and story variables are cleared.
    pub fn start(&mut self) {
        info!(story = %self.name, start = %self.start.name, "starting story");
        self.character = Character::new(&self.config);
        self.vars.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.history.clear();
        self.current = None;
        self.rendered_text.clear();
        self.choices.clear();
        self.loot = None;
        self.shop = None;
        self.error = None;
        self.finished = false;

        let start = Rc::clone(&self.start);
        self.show_passage(start, ChoiceKind::Link);
    }

    /// Follow one of the current choices.
    ///
    /// Returns false, changing nothing, when the id does not belong to the
    /// currently published choices or the story is finished. Also returns
    /// false when the target fails to render; see [`Story::fatal_error`].
    pub fn choose(&mut self, id: ChoiceId) -> bool {
        if self.finished {
            debug!(?id, "story is finished, ignoring choice");
            return false;
        }
        let Some(choice) = self.choices.get(id.index()).filter(|c| c.id() == id) else {
            debug!(?id, "ignoring stale choice");
            return false;
        };
        let target = Rc::clone(choice.target());
        let kind = choice.kind();
        self.show_passage(target, kind)
    }

    /// Jump to a passage by name.
    ///
    /// An unknown name is an error. A template failure in the target is
    /// recorded in [`Story::error`] instead, and `Ok(false)` is returned.
    pub fn show(&mut self, name: &str) -> StoryResult<bool> {
        let passage = Rc::clone(self.passage(name)?);
        Ok(self.show_passage(passage, ChoiceKind::Link))
    }

    /// Look up a catalog item by tag.
    pub fn get_item(&self, tag: &str) -> StoryResult<Rc<Item>> {
        self.items
            .iter()
            .find(|i| i.tag == tag)
            .cloned()
            .ok_or_else(|| StoryError::ItemNotFound(tag.to_string()))
    }

    /// Look up a catalog stat by name.
    pub fn get_stat(&self, name: &str) -> StoryResult<Rc<Stat>> {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| StoryError::StatNotFound(name.to_string()))
    }

    /// Add a catalog item to the current loot, creating the loot panel if
    /// needed. Returns false when the loot is full.
    pub fn add_loot_item(&mut self, tag: &str) -> StoryResult<bool> {
        let item = self.get_item(tag)?;
        let capacity = self.config.loot_capacity;
        Ok(self
            .loot
            .get_or_insert_with(|| Inventory::new(capacity))
            .add(item))
    }

    /// Offer a catalog item in the current shop, creating the shop if needed.
    /// A negative price is rejected and leaves the shop untouched.
    pub fn add_shop_item(&mut self, tag: &str, price: i64) -> StoryResult<()> {
        let entry = ShopEntry::new(self.get_item(tag)?, price)?;
        self.shop.get_or_insert_with(Shop::new).push(entry);
        Ok(())
    }

    /// Whether the shop entry at `index` can be bought right now.
    pub fn can_buy(&self, index: usize) -> bool {
        self.shop
            .as_ref()
            .is_some_and(|shop| shop.can_buy(index, &self.character))
    }

    /// Buy the shop entry at `index`.
    pub fn buy(&mut self, index: usize) -> bool {
        let Some(shop) = self.shop.as_mut() else {
            return false;
        };
        let bought = shop.buy(index, &mut self.character);
        debug!(index, bought, "buy");
        bought
    }

    /// Move the loot item at `index` into the character's first free slot.
    pub fn take_loot(&mut self, index: usize) -> bool {
        let Some(loot) = self.loot.as_mut() else {
            return false;
        };
        if self.character.inventory.is_full() {
            return false;
        }
        match loot.take(index) {
            Ok(Some(item)) => self.character.give(item),
            _ => false,
        }
    }

    /// Exchange the contents of two slots, possibly across inventories.
    pub fn swap(&mut self, a: SlotRef, b: SlotRef) -> StoryResult<()> {
        let character = &mut self.character.inventory;
        match (a, b) {
            (SlotRef::Character(i), SlotRef::Character(j)) => character.swap_slots(i, j)?,
            (SlotRef::Loot(i), SlotRef::Loot(j)) => {
                self.loot.as_mut().ok_or(StoryError::NoLoot)?.swap_slots(i, j)?;
            }
            (SlotRef::Character(i), SlotRef::Loot(j)) => {
                let loot = self.loot.as_mut().ok_or(StoryError::NoLoot)?;
                inventory::swap(character, i, loot, j)?;
            }
            (SlotRef::Loot(i), SlotRef::Character(j)) => {
                let loot = self.loot.as_mut().ok_or(StoryError::NoLoot)?;
                inventory::swap(loot, i, character, j)?;
            }
        }
        Ok(())
    }

    /// Story title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Story configuration.
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// All authored passages.
    pub fn passages(&self) -> &[Rc<Passage>] {
        &self.passages
    }

    /// Look up a passage by name.
    pub fn passage(&self, name: &str) -> StoryResult<&Rc<Passage>> {
        self.by_name
            .get(name)
            .ok_or_else(|| StoryError::PassageNotFound(name.to_string()))
    }

    /// The passage the story starts on.
    pub fn start_passage(&self) -> &Rc<Passage> {
        &self.start
    }

    /// The passage the death choice leads to.
    pub fn final_passage(&self) -> &Rc<Passage> {
        &self.final_passage
    }

    /// Catalog items.
    pub fn items(&self) -> &[Rc<Item>] {
        &self.items
    }

    /// Catalog stats.
    pub fn stats(&self) -> &[Rc<Stat>] {
        &self.stats
    }

    /// The passage currently shown.
    pub fn current_passage(&self) -> Option<&Rc<Passage>> {
        self.current.as_ref()
    }

    /// HTML of the current passage, without link tokens.
    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }

    /// Choices offered by the current passage.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Loot offered by the current passage.
    pub fn lootable_inventory(&self) -> Option<&Inventory> {
        self.loot.as_ref()
    }

    /// Shop offered by the current passage.
    pub fn shop(&self) -> Option<&Shop> {
        self.shop.as_ref()
    }

    /// The most recent error message, kept until the story restarts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|(_, message)| message.as_str())
    }

    /// Whether the most recent error aborted a transition or only reported
    /// a missing link.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|(kind, _)| *kind)
    }

    /// The error message if the most recent error aborted a transition.
    ///
    /// While this is set the published passage and choices are stale, and
    /// a presentation layer should show the error instead of them.
    pub fn fatal_error(&self) -> Option<&str> {
        match &self.error {
            Some((ErrorKind::Transition, message)) => Some(message),
            _ => None,
        }
    }

    /// True once the death choice has been followed.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Every passage shown since the story started, oldest first.
    pub fn history(&self) -> &[Rc<Passage>] {
        &self.history
    }

    /// The player character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Story variables set by templates through `vars`.
    pub fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }

    fn show_passage(&mut self, passage: Rc<Passage>, kind: ChoiceKind) -> bool {
        let name = passage.name.clone();
        match self.transition(passage, kind) {
            Ok(transition) => {
                self.commit(transition);
                true
            }
            Err(err) => {
                warn!(passage = %name, error = %err, "passage failed to render");
                self.error = Some((ErrorKind::Transition, err.to_string()));
                false
            }
        }
    }

    /// Run a passage against staged state and work out what to publish.
    fn transition(&self, passage: Rc<Passage>, kind: ChoiceKind) -> StoryResult<Transition> {
        let mut stage = Stage {
            character: self.character.clone(),
            vars: self.vars.clone(),
            loot: None,
            shop: None,
            rng: self.rng.clone(),
        };

        let mut passage = passage;
        let mut redirects = 0;
        let text = loop {
            let template = sk_script::compile(&passage.content)?;
            let mut scope = Scope::new(self, &mut stage, &passage);
            let text = template.render(&mut scope)?;
            let Some(next) = scope.into_redirect() else {
                break text;
            };

            redirects += 1;
            if redirects > MAX_REDIRECTS {
                return Err(StoryError::TooManyRedirects(next.name.clone()));
            }
            debug!(from = %passage.name, to = %next.name, "redirect");
            stage.clear_panels();
            passage = next;
        };

        let generation = self.generation + 1;
        let mut choices = Vec::new();
        let mut link_error = None;

        match kind {
            ChoiceKind::Death => {}
            ChoiceKind::Link if stage.character.is_dead() => {
                debug!(passage = %passage.name, "character is dead");
                let message = self.config.dead_message.as_str();
                choices.push(Choice::new(
                    ChoiceId::new(generation, 0),
                    Rc::clone(&self.final_passage),
                    message,
                    message,
                    ChoiceKind::Death,
                ));
            }
            ChoiceKind::Link => {
                for found in link::find_links(&text) {
                    match self.by_name.get(&found.target) {
                        Some(target) => {
                            let id = ChoiceId::new(generation, choices.len());
                            let html = markdown::render(&found.label);
                            choices.push(Choice::new(id, Rc::clone(target), found.label, html, ChoiceKind::Link));
                        }
                        None => {
                            warn!(passage = %passage.name, target = %found.target, "link to a missing passage");
                            link_error = Some(StoryError::LinkTargetNotFound(found.target).to_string());
                        }
                    }
                }
            }
        }

        let rendered_text = markdown::render(&link::strip_links(&text));

        Ok(Transition {
            passage,
            stage,
            rendered_text,
            choices,
            link_error,
            kind,
        })
    }

    fn commit(&mut self, transition: Transition) {
        let Transition {
            passage,
            stage,
            rendered_text,
            choices,
            link_error,
            kind,
        } = transition;

        debug!(passage = %passage.name, choices = choices.len(), "passage shown");

        self.character = stage.character;
        self.vars = stage.vars;
        self.loot = stage.loot;
        self.shop = stage.shop;
        self.rng = stage.rng;
        self.rendered_text = rendered_text;
        self.choices = choices;
        self.generation += 1;
        if let Some(message) = link_error {
            self.error = Some((ErrorKind::Link, message));
        }
        self.history.push(Rc::clone(&passage));
        self.current = Some(passage);

        if kind == ChoiceKind::Death {
            self.finished = true;
            info!(story = %self.name, "story finished");
        }
    }
}
