//! Basic example: a base value with flat and percentage modifiers
//!
//! This example demonstrates:
//! - Creating a numeric from a base value
//! - Adding flat addition modifiers
//! - Scaling the base value with a fraction modifier
//! - Reading the cached final value

use nummod::*;

fn main() -> Result<(), NumericError> {
    // Create the base value
    let mut health = Numeric::new(100)?;
    println!("Base HP: 100");

    // Flat additions
    println!("\nAdding flat modifiers:");
    health.add_modifier(Modifier::addition(50, TagSet::new(), "ring of vitality", 1)?);
    println!("  - Ring of vitality: +50");

    health.add_modifier(Modifier::addition(25, TagSet::new(), "hearty meal", 1)?);
    println!("  - Hearty meal: +25");

    // A percentage bonus on the base value only
    println!("\nAdding a fraction modifier:");
    health.add_modifier(Modifier::fraction(
        120,
        100,
        FractionMode::Override,
        TagSet::from([SELF_TAG]),
        "vitality blessing",
        1,
    )?);
    println!("  - Vitality blessing: base x 120/100");

    // Resolve
    let value = health.final_value()?;
    println!("\n=== Final Value ===");
    println!("HP: {value}");
    println!("\nCalculation: 100 * 1.2 + 50 + 25 = {value}");

    // The value stays cached until the next mutation
    println!("Cache clean: {}", !health.is_dirty());

    Ok(())
}
