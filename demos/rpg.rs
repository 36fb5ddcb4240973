//! RPG character sheet example
//!
//! This example demonstrates:
//! - Deriving a character stat from a base value and equipment
//! - Stacking a buff by re-adding the same named modifier
//! - Percentage scaling scoped to equipment only
//! - Removing modifiers when items are unequipped
//! - Persisting a snapshot with serde

use nummod::*;

// ============================================================================
// Items
// ============================================================================

/// An equippable item: a named bundle of modifiers.
struct Item {
    name: &'static str,
    modifiers: Vec<Modifier>,
}

fn iron_sword() -> Result<Item, NumericError> {
    Ok(Item {
        name: "Iron Sword",
        modifiers: vec![Modifier::addition(
            20,
            TagSet::from(["Equipment"]),
            "iron sword",
            1,
        )?],
    })
}

fn honing_stone() -> Result<Item, NumericError> {
    Ok(Item {
        name: "Honing Stone",
        modifiers: vec![Modifier::fraction(
            150,
            100,
            FractionMode::Increase,
            TagSet::from(["Equipment"]),
            "honing stone",
            1,
        )?],
    })
}

// ============================================================================
// Character
// ============================================================================

struct Character {
    name: &'static str,
    attack: Numeric,
}

impl Character {
    fn new(name: &'static str, base_attack: i64) -> Result<Self, NumericError> {
        Ok(Self {
            name,
            attack: Numeric::new(base_attack)?,
        })
    }

    fn equip(&mut self, item: &Item) {
        for modifier in &item.modifiers {
            self.attack.add_modifier(modifier.clone());
        }
    }

    fn unequip(&mut self, item: &Item) {
        for modifier in &item.modifiers {
            self.attack.remove_modifier(modifier);
        }
    }
}

fn main() -> Result<(), NumericError> {
    let mut hero = Character::new("Aldric", 50)?;
    println!("{} starts with ATK {}", hero.name, hero.attack.final_value()?);

    // Equip gear: the sword adds a tagged 20, the stone grows it by 150%.
    let sword = iron_sword()?;
    let stone = honing_stone()?;
    hero.equip(&sword);
    println!("Equipped {}: ATK {}", sword.name, hero.attack.final_value()?);
    hero.equip(&stone);
    println!("Equipped {}: ATK {}", stone.name, hero.attack.final_value()?);

    // A stacking shout: re-adding the same name merges the counts.
    let war_cry = Modifier::addition(5, TagSet::from(["Buff"]), "war cry", 1)?;
    for _ in 0..3 {
        hero.attack.add_modifier(war_cry.clone());
    }
    println!("War cry x3: ATK {}", hero.attack.final_value()?);

    // A training cap keeps the total in check.
    hero.attack.add_modifier(Modifier::clamp(Some(0), Some(110), "training cap")?);
    println!("Training cap at 110: ATK {}", hero.attack.final_value()?);

    // Unequipping removes by name.
    hero.unequip(&stone);
    println!("Unequipped {}: ATK {}", stone.name, hero.attack.final_value()?);

    // Persist what can be persisted.
    let snapshot = hero.attack.all_modifiers();
    println!(
        "\nSnapshot: {} modifiers, {} persistable",
        snapshot.modifiers.len(),
        snapshot.persistable().count()
    );
    println!("{}", serde_json::to_string_pretty(&snapshot).expect("snapshot serializes"));

    Ok(())
}
