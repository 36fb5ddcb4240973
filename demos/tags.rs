//! Tag scoping example: percentages that target specific contributions
//!
//! This example demonstrates:
//! - Tagging additions by their origin
//! - Fractions that scale only tag-matching additions
//! - The SELF tag targeting the base value
//! - Untagged fractions rescaling the base while additions pass through

use nummod::*;

fn equipment_scope() -> Result<(), NumericError> {
    let mut attack = Numeric::new(100)?;
    attack.add_modifier(Modifier::addition(20, TagSet::from(["Equipment"]), "iron sword", 1)?);
    attack.add_modifier(Modifier::addition(10, TagSet::from(["Buff"]), "war cry", 1)?);
    println!("ATK = 100 base, +20 Equipment, +10 Buff = {}", attack.final_value()?);

    // +150% on Equipment only: the sword's 20 grows to 50, everything else
    // is untouched.
    attack.add_modifier(Modifier::fraction(
        150,
        100,
        FractionMode::Increase,
        TagSet::from(["Equipment"]),
        "honing stone",
        1,
    )?);
    println!("With honing stone (+150% on Equipment): {}", attack.final_value()?);
    Ok(())
}

fn self_scope() -> Result<(), NumericError> {
    let mut attack = Numeric::new(100)?;
    attack.add_modifier(Modifier::addition(30, TagSet::new(), "charm", 1)?);

    // The SELF tag addresses the base value: 100 doubles, the 30 passes.
    attack.add_modifier(Modifier::fraction(
        2,
        1,
        FractionMode::Override,
        TagSet::from([SELF_TAG]),
        "giant's strength",
        1,
    )?);
    println!("Giant's strength (base x 2): {}", attack.final_value()?);
    Ok(())
}

fn untagged_scope() -> Result<(), NumericError> {
    let mut attack = Numeric::new(100)?;
    attack.add_modifier(Modifier::addition(30, TagSet::new(), "charm", 1)?);

    // An untagged fraction also rescales the base only.
    attack.add_modifier(Modifier::fraction(
        200,
        100,
        FractionMode::Override,
        TagSet::new(),
        "empower",
        1,
    )?);
    println!("Empower (untagged x 2): {}", attack.final_value()?);
    Ok(())
}

fn main() -> Result<(), NumericError> {
    println!("=== Equipment scope ===");
    equipment_scope()?;

    println!("\n=== SELF scope ===");
    self_scope()?;

    println!("\n=== Untagged ===");
    untagged_scope()?;

    Ok(())
}
