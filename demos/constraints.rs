//! Constraints example: clamps, custom transforms and conditional modifiers
//!
//! This example demonstrates:
//! - Clamp constraints applied after every ordinary modifier
//! - Custom transforms over the external decimal value
//! - Conditional modifiers reading live state
//! - Cache behavior across mutations

use nummod::*;

fn main() -> Result<(), NumericError> {
    // --- Capping a crit chance with a decimal transform ---
    let mut crit = Numeric::from_f64(0.30)?;
    crit.add_modifier(Modifier::addition_f64(0.60, TagSet::new(), "lucky charm", 1)?);
    println!("Crit before cap: {}", crit.final_value_f64()?);

    crit.add_modifier(Modifier::custom_value(|v| v.min(0.75), "crit cap", 1)?);
    println!("Crit after cap:  {}", crit.final_value_f64()?);

    // --- Integer clamp on damage ---
    let mut damage = Numeric::new(80)?;
    damage.add_modifier(Modifier::addition(200, TagSet::new(), "berserk", 1)?);
    damage.add_modifier(Modifier::clamp(Some(0), Some(150), "damage cap")?);
    println!("\nDamage: 80 + 200, capped at 150 = {}", damage.final_value()?);

    // --- A bonus that exists only while something else does ---
    let mut speed = Numeric::new(100)?;
    speed.add_modifier(Modifier::conditional(
        |n: &Numeric| n.additive_sum().map_or(false, |sum| sum > 0),
        Modifier::addition(30, TagSet::new(), "momentum", 1)?,
        "momentum while buffed",
        1,
    )?);
    println!("\nSpeed without buff: {}", speed.final_value()?);

    let haste = Modifier::addition(20, TagSet::new(), "haste", 1)?;
    speed.add_modifier(haste.clone());
    println!("Speed with haste:   {}", speed.final_value()?);

    speed.remove_modifier(&haste);
    println!("Haste expired:      {}", speed.final_value()?);

    // --- The cache recomputes only after mutations ---
    println!("\nCache clean after read: {}", !speed.is_dirty());
    speed.add_modifier(Modifier::addition(5, TagSet::new(), "tailwind", 1)?);
    println!("Dirty after mutation:   {}", speed.is_dirty());
    println!("Last good (scaled):     {:?}", speed.cached_value());

    Ok(())
}
