//! Script bindings for a passage being rendered.
//!
//! Templates run against a [`Stage`]: a private copy of the mutable session
//! state. The engine publishes the stage only when the whole transition
//! succeeds.

use std::collections::BTreeMap;
use std::rc::Rc;

use rand::Rng;
use rand::rngs::StdRng;
use sk_core::{Character, Inventory, Passage, Shop, ShopEntry};
use sk_script::host::{expect_args, number_arg, str_arg};
use sk_script::{ScriptError, ScriptHost, ScriptResult, Value};

use crate::error::StoryError;
use crate::story::Story;

const STORY: &str = "story";
const CHARACTER: &str = "character";
const VARS: &str = "vars";
const CHARACTER_INVENTORY: &str = "character.inventory";
const LOOT: &str = "story.lootableInventory";
const SHOP: &str = "story.shop";

/// Session state a transition may change.
#[derive(Debug, Clone)]
pub(crate) struct Stage {
    pub(crate) character: Character,
    pub(crate) vars: BTreeMap<String, Value>,
    pub(crate) loot: Option<Inventory>,
    pub(crate) shop: Option<Shop>,
    pub(crate) rng: StdRng,
}

impl Stage {
    /// Forget the side panels built by a template that redirected.
    pub(crate) fn clear_panels(&mut self) {
        self.loot = None;
        self.shop = None;
    }
}

/// The [`ScriptHost`] seen by one passage template.
pub(crate) struct Scope<'a> {
    story: &'a Story,
    stage: &'a mut Stage,
    passage: &'a Passage,
    redirect: Option<Rc<Passage>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(story: &'a Story, stage: &'a mut Stage, passage: &'a Passage) -> Self {
        Self {
            story,
            stage,
            passage,
            redirect: None,
        }
    }

    /// The passage requested with `story.show(...)`, if any. The last
    /// request wins.
    pub(crate) fn into_redirect(self) -> Option<Rc<Passage>> {
        self.redirect
    }

    fn inventory(&self, object: &str) -> Option<&Inventory> {
        match object {
            CHARACTER_INVENTORY => Some(&self.stage.character.inventory),
            LOOT => self.stage.loot.as_ref(),
            _ => None,
        }
    }

    fn inventory_mut(&mut self, object: &str) -> Option<&mut Inventory> {
        match object {
            CHARACTER_INVENTORY => Some(&mut self.stage.character.inventory),
            LOOT => self.stage.loot.as_mut(),
            _ => None,
        }
    }

    fn item_arg(&self, name: &str, args: &[Value]) -> ScriptResult<Rc<sk_core::Item>> {
        match args.first() {
            Some(Value::Item(item)) => Ok(Rc::clone(item)),
            _ => Ok(self.story.get_item(str_arg(name, args, 0)?)?),
        }
    }

    fn story_call(&mut self, method: &str, args: Vec<Value>) -> ScriptResult<Value> {
        match method {
            "show" => {
                expect_args(method, &args, 1)?;
                let passage = self.story.passage(str_arg(method, &args, 0)?)?;
                self.redirect = Some(Rc::clone(passage));
                Ok(Value::Null)
            }
            "getItem" => {
                expect_args(method, &args, 1)?;
                Ok(Value::Item(self.story.get_item(str_arg(method, &args, 0)?)?))
            }
            "getStat" => {
                expect_args(method, &args, 1)?;
                Ok(Value::Stat(self.story.get_stat(str_arg(method, &args, 0)?)?))
            }
            "addLootItem" => {
                expect_args(method, &args, 1)?;
                let item = self.item_arg(method, &args)?;
                let capacity = self.story.config().loot_capacity;
                let loot = self.stage.loot.get_or_insert_with(|| Inventory::new(capacity));
                Ok(loot.add(item).into())
            }
            "addShopItem" => {
                expect_args(method, &args, 2)?;
                let item = self.item_arg(method, &args)?;
                let price = int_arg(method, &args, 1)?;
                let entry = ShopEntry::new(item, price).map_err(|e| ScriptError::Type(e.to_string()))?;
                self.stage.shop.get_or_insert_with(Shop::new).push(entry);
                Ok(Value::Null)
            }
            "visited" => {
                expect_args(method, &args, 1)?;
                let name = str_arg(method, &args, 0)?;
                Ok(self.story.history().iter().any(|p| p.name == name).into())
            }
            _ => Err(no_method(STORY, method)),
        }
    }

    fn character_call(&mut self, method: &str, args: Vec<Value>) -> ScriptResult<Value> {
        let character = &mut self.stage.character;
        match method {
            "stat" | "getStat" => {
                expect_args(method, &args, 1)?;
                let name = str_arg(method, &args, 0)?;
                character
                    .stat(name)
                    .map(Value::from)
                    .ok_or_else(|| StoryError::StatNotFound(name.to_string()).into())
            }
            "setStat" => {
                expect_args(method, &args, 2)?;
                let name = str_arg(method, &args, 0)?;
                let value = int_arg(method, &args, 1)?;
                character.set_stat(name, value);
                Ok(value.into())
            }
            "addStat" => {
                expect_args(method, &args, 2)?;
                let name = str_arg(method, &args, 0)?;
                let delta = int_arg(method, &args, 1)?;
                Ok(character.adjust_stat(name, delta).into())
            }
            "hasItem" => {
                expect_args(method, &args, 1)?;
                Ok(character.has_item(str_arg(method, &args, 0)?).into())
            }
            "removeItem" => {
                expect_args(method, &args, 1)?;
                let tag = str_arg(method, &args, 0)?;
                Ok(character.inventory.remove(tag).is_some().into())
            }
            "addItem" => {
                expect_args(method, &args, 1)?;
                let item = self.item_arg(method, &args)?;
                Ok(self.stage.character.give(item).into())
            }
            _ => Err(no_method(CHARACTER, method)),
        }
    }

    fn inventory_call(&mut self, object: &str, method: &str, args: Vec<Value>) -> ScriptResult<Value> {
        match method {
            "add" => {
                expect_args(method, &args, 1)?;
                let item = self.item_arg(method, &args)?;
                let inventory = self.inventory_mut(object).ok_or_else(|| no_method(object, method))?;
                Ok(inventory.add(item).into())
            }
            "has" | "remove" => {
                expect_args(method, &args, 1)?;
                let tag = match args.first() {
                    Some(Value::Item(item)) => item.tag.clone(),
                    _ => str_arg(method, &args, 0)?.to_string(),
                };
                let inventory = self.inventory_mut(object).ok_or_else(|| no_method(object, method))?;
                if method == "has" {
                    Ok(inventory.contains(&tag).into())
                } else {
                    Ok(inventory.remove(&tag).is_some().into())
                }
            }
            _ => Err(no_method(object, method)),
        }
    }
}

impl ScriptHost for Scope<'_> {
    fn global(&self, name: &str) -> Option<Value> {
        match name {
            STORY | CHARACTER | VARS => Some(Value::Object(name.to_string())),
            _ => None,
        }
    }

    fn get(&self, object: &str, property: &str) -> ScriptResult<Value> {
        match (object, property) {
            (STORY, "name") => Ok(self.story.name().into()),
            (STORY, "passage") => Ok(self.passage.name.as_str().into()),
            (STORY, "turns") => Ok(self.story.history().len().into()),
            (STORY, "lootableInventory") => {
                Ok(self.stage.loot.as_ref().map(|_| Value::Object(LOOT.into())).into())
            }
            (STORY, "shop") => Ok(self.stage.shop.as_ref().map(|_| Value::Object(SHOP.into())).into()),
            (CHARACTER, "dead") => Ok(self.stage.character.is_dead().into()),
            (CHARACTER, "inventory") => Ok(Value::Object(CHARACTER_INVENTORY.into())),
            (VARS, name) => Ok(self.stage.vars.get(name).cloned().into()),
            (SHOP, "count") => Ok(self.stage.shop.as_ref().map_or(0, Shop::len).into()),
            (CHARACTER_INVENTORY | LOOT, _) => {
                let inventory = self.inventory(object).ok_or_else(|| no_property(object, property))?;
                match property {
                    "capacity" => Ok(inventory.capacity().into()),
                    "count" => Ok(inventory.count().into()),
                    "full" => Ok(inventory.is_full().into()),
                    _ => Err(no_property(object, property)),
                }
            }
            _ => Err(no_property(object, property)),
        }
    }

    fn set(&mut self, object: &str, property: &str, value: Value) -> ScriptResult<()> {
        match object {
            VARS => {
                self.stage.vars.insert(property.to_string(), value);
                Ok(())
            }
            _ => Err(ScriptError::Type(format!("{object}.{property} is read-only"))),
        }
    }

    fn call(&mut self, object: &str, method: &str, args: Vec<Value>) -> ScriptResult<Value> {
        match object {
            STORY => self.story_call(method, args),
            CHARACTER => self.character_call(method, args),
            CHARACTER_INVENTORY | LOOT => self.inventory_call(object, method, args),
            SHOP if method == "canBuy" => {
                expect_args(method, &args, 1)?;
                let index = int_arg(method, &args, 0)?;
                let affordable = match (usize::try_from(index), &self.stage.shop) {
                    (Ok(index), Some(shop)) => shop.can_buy(index, &self.stage.character),
                    _ => false,
                };
                Ok(affordable.into())
            }
            _ => Err(no_method(object, method)),
        }
    }

    /// `random()` yields a float in `[0, 1)`, `random(max)` and
    /// `random(min, max)` yield integers with both bounds included.
    fn call_function(&mut self, name: &str, args: Vec<Value>) -> ScriptResult<Value> {
        if name != "random" {
            return Err(ScriptError::Undefined(name.to_string()));
        }
        let (low, high) = match args.len() {
            0 => return Ok(Value::Number(self.stage.rng.random::<f64>())),
            1 => (0, int_arg(name, &args, 0)?),
            2 => (int_arg(name, &args, 0)?, int_arg(name, &args, 1)?),
            got => {
                return Err(ScriptError::Arity {
                    name: name.to_string(),
                    expected: 2,
                    got,
                });
            }
        };
        if low > high {
            return Err(ScriptError::Type(format!("random({low}, {high}) has an empty range")));
        }
        Ok(self.stage.rng.random_range(low..=high).into())
    }
}

fn int_arg(name: &str, args: &[Value], index: usize) -> ScriptResult<i64> {
    let n = number_arg(name, args, index)?;
    if n.is_finite() {
        Ok(n.round() as i64)
    } else {
        Err(ScriptError::Type(format!("{name} expects a finite number")))
    }
}

fn no_property(object: &str, property: &str) -> ScriptError {
    ScriptError::NoProperty {
        target: object.to_string(),
        property: property.to_string(),
    }
}

fn no_method(object: &str, method: &str) -> ScriptError {
    ScriptError::NoMethod {
        target: object.to_string(),
        method: method.to_string(),
    }
}
