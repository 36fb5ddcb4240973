//! Tests for modifier construction, storage and snapshots.
//!
//! These tests verify:
//! - Builder API parity with the named constructors
//! - Merge-by-name and anonymous entry semantics
//! - Removal rules for opaque payloads (critical)
//! - Snapshot capture order and serde layout
//! - Display formatting

use nummod::*;

// ============================================================================
// Builder API
// ============================================================================

#[test]
fn test_builder_defaults() {
    let bonus = Modifier::addition_of(5).build().unwrap();

    assert!(bonus.is_anonymous());
    assert_eq!(bonus.name(), DEFAULT_NAME);
    assert_eq!(bonus.count(), 1);
    assert_eq!(bonus.priority(), Priority::Skill);
    assert!(bonus.tags().is_empty());
}

#[test]
fn test_builder_parity_with_constructor() {
    let built = Modifier::addition_of(50)
        .tags(["Equipment"])
        .name("ring")
        .count(2)
        .build()
        .unwrap();
    let direct = Modifier::addition(50, TagSet::from(["Equipment"]), "ring", 2).unwrap();

    assert_eq!(built.name(), direct.name());
    assert_eq!(built.count(), direct.count());
    assert_eq!(built.priority(), direct.priority());
    assert_eq!(built.tags(), direct.tags());

    // Identical behavior through a numeric.
    let mut a = Numeric::new(100).unwrap();
    a.add_modifier(built);
    let mut b = Numeric::new(100).unwrap();
    b.add_modifier(direct);
    assert_eq!(a.final_value().unwrap(), b.final_value().unwrap());
}

#[test]
fn test_builder_variant_default_priorities() {
    let addition = Modifier::addition_of(1).build().unwrap();
    assert_eq!(addition.priority(), Priority::Skill);

    let fraction = Modifier::fraction_of(3, 2, FractionMode::Increase).build().unwrap();
    assert_eq!(fraction.priority(), Priority::Multiplier);

    let clamp = Modifier::clamp_of(None, Some(100)).build().unwrap();
    assert_eq!(clamp.priority(), Priority::Clamp);

    let custom = Modifier::custom_of(|v| v).build().unwrap();
    assert_eq!(custom.priority(), Priority::Clamp);

    // Conditionals inherit the wrapped modifier's tier.
    let gated = Modifier::conditional_of(|_: &Numeric| true, addition).build().unwrap();
    assert_eq!(gated.priority(), Priority::Skill);
}

#[test]
fn test_builder_validation_matches_constructors() {
    let err = Modifier::fraction_of(1, 0, FractionMode::Override).build().unwrap_err();
    assert!(matches!(err, NumericError::InvalidArgument(_)));

    let err = Modifier::addition_of(5).name("").build().unwrap_err();
    assert!(matches!(err, NumericError::InvalidArgument(_)));

    let err = Modifier::addition_of(5).count(0).build().unwrap_err();
    assert!(matches!(err, NumericError::InvalidArgument(_)));

    let err = Modifier::addition_of(5).count(-2).build().unwrap_err();
    assert!(matches!(err, NumericError::InvalidArgument(_)));
}

#[test]
fn test_builder_priority_override() {
    let early = Modifier::addition_of(5)
        .name("base boost")
        .priority(Priority::Critical)
        .build()
        .unwrap();
    assert_eq!(early.priority(), Priority::Critical);
}

#[test]
fn test_builder_tag_accumulation() {
    let bonus = Modifier::addition_of(5).tag("Equipment").tag("Ring").build().unwrap();
    assert_eq!(bonus.tags().len(), 2);
    assert!(bonus.tags().intersects(&TagSet::from(["Ring"])));

    // tags() replaces whatever was accumulated before it.
    let replaced = Modifier::addition_of(5)
        .tag("Equipment")
        .tags(["Accessory"])
        .build()
        .unwrap();
    assert_eq!(replaced.tags().len(), 1);
    assert!(replaced.tags().intersects(&TagSet::from(["Accessory"])));
}

#[test]
fn test_builder_clamp_through_numeric() {
    let mut health = Numeric::new(250).unwrap();
    health.add_modifier(
        Modifier::clamp_of(Some(0), Some(100)).name("hp cap").build().unwrap(),
    );
    assert_eq!(health.final_value().unwrap(), 100);
}

#[test]
fn test_builder_conditional_through_numeric() {
    let inner = Modifier::addition_of(10).name("rage").build().unwrap();
    let gated = Modifier::conditional_of(
        |n: &Numeric| n.additive_sum().map_or(false, |sum| sum == 0),
        inner,
    )
    .name("rage gate")
    .build()
    .unwrap();

    let mut damage = Numeric::new(100).unwrap();
    damage.add_modifier(gated);

    // No ordinary additions, so the gate is open.
    assert_eq!(damage.final_value().unwrap(), 110);
}

// ============================================================================
// Collection Semantics
// ============================================================================

#[test]
fn test_merge_keeps_first_payload() {
    let mut collection = ModifierCollection::new();
    collection.add(Modifier::addition(50, TagSet::new(), "ring", 1).unwrap());
    collection.add(Modifier::addition(9999, TagSet::new(), "ring", 1).unwrap());

    // The name is the identity key: one entry, counts summed, first payload kept.
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.find_by_name("ring").unwrap().count(), 2);
    assert_eq!(collection.additive_sum().unwrap(), 2 * 50 * fixed::SCALE);
}

#[test]
fn test_anonymous_entries_never_merge() {
    let mut health = Numeric::new(100).unwrap();
    health.add_modifier(Modifier::addition_of(50).build().unwrap());
    health.add_modifier(Modifier::addition_of(50).build().unwrap());

    assert_eq!(health.modifier_count(), 2);
    assert_eq!(health.final_value().unwrap(), 200);
}

#[test]
fn test_of_kind_filter() {
    let mut collection = ModifierCollection::new();
    collection.add(Modifier::addition(20, TagSet::new(), "sword", 1).unwrap());
    collection.add(
        Modifier::fraction(3, 2, FractionMode::Increase, TagSet::new(), "blessing", 1).unwrap(),
    );
    collection.add(Modifier::clamp(None, Some(100), "cap").unwrap());

    assert_eq!(collection.of_kind(ModifierKind::Addition).count(), 1);
    assert_eq!(collection.of_kind(ModifierKind::Fraction).count(), 1);
    assert_eq!(collection.of_kind(ModifierKind::Custom).count(), 1);
    assert_eq!(collection.of_kind(ModifierKind::Conditional).count(), 0);
}

#[test]
fn test_additive_sum_tag_queries() {
    let mut collection = ModifierCollection::new();
    collection.add(Modifier::addition(20, TagSet::from(["Equipment"]), "sword", 1).unwrap());
    collection.add(Modifier::addition(30, TagSet::from(["Accessory"]), "amulet", 1).unwrap());
    collection.add(Modifier::addition(50, TagSet::new(), "charm", 1).unwrap());

    // An empty query is unfiltered; tagged queries skip untagged entries.
    assert_eq!(collection.additive_sum().unwrap(), 100 * fixed::SCALE);
    assert_eq!(
        collection.additive_sum_by_tags(&TagSet::from(["Equipment"])).unwrap(),
        20 * fixed::SCALE
    );
    assert_eq!(
        collection
            .additive_sum_by_tags(&TagSet::from(["Equipment", "Accessory"]))
            .unwrap(),
        50 * fixed::SCALE
    );
}

// ============================================================================
// Removal Semantics
// ============================================================================

#[test]
fn test_anonymous_removed_by_structural_match() {
    let mut collection = ModifierCollection::new();
    collection.add(Modifier::addition(50, TagSet::new(), "keeper", 1).unwrap());
    collection.add(Modifier::addition_of(50).build().unwrap());

    // The anonymous +50 goes; the identically-valued named entry stays.
    let twin = Modifier::addition_of(50).build().unwrap();
    assert!(collection.remove(&twin));
    assert_eq!(collection.len(), 1);
    assert!(collection.find_by_name("keeper").is_some());

    // Nothing anonymous left to match.
    assert!(!collection.remove(&twin));
}

#[test]
fn test_opaque_payloads_never_match_structurally() {
    let mut health = Numeric::new(250).unwrap();
    health.add_modifier(Modifier::clamp_of(None, Some(100)).build().unwrap());
    assert_eq!(health.final_value().unwrap(), 100);

    // An identically-built anonymous clamp cannot be matched by structure.
    let twin = Modifier::clamp_of(None, Some(100)).build().unwrap();
    assert!(!health.remove_modifier(&twin));
    assert!(health.is_dirty()); // removal attempts always dirty the cache
    assert_eq!(health.final_value().unwrap(), 100);

    // clear_constraints is the escape hatch.
    health.clear_constraints();
    assert_eq!(health.final_value().unwrap(), 250);
}

#[test]
fn test_named_custom_removed_by_name() {
    let mut health = Numeric::new(250).unwrap();
    health.add_modifier(Modifier::clamp(None, Some(100), "cap").unwrap());
    assert_eq!(health.final_value().unwrap(), 100);

    assert!(health.remove_modifier(&Modifier::clamp(None, Some(100), "cap").unwrap()));
    assert_eq!(health.final_value().unwrap(), 250);
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn test_display_formats() {
    let flat = Modifier::addition(50, TagSet::new(), "ring", 1).unwrap();
    assert_eq!(flat.to_string(), "+50.00");

    let stacked = Modifier::addition(50, TagSet::from(["Equipment"]), "ring", 2).unwrap();
    assert_eq!(stacked.to_string(), "+50.00 ×2 [Equipment]");

    let doubling =
        Modifier::fraction(2, 1, FractionMode::Override, TagSet::new(), "double", 1).unwrap();
    assert_eq!(doubling.to_string(), "×2/1");

    let growth =
        Modifier::fraction(150, 100, FractionMode::Increase, TagSet::new(), "honing", 1).unwrap();
    assert_eq!(growth.to_string(), "+150/100");

    let cap = Modifier::clamp(None, Some(100), "cap").unwrap();
    assert_eq!(cap.to_string(), "custom(raw)");

    let gated = Modifier::conditional(
        |_: &Numeric| true,
        Modifier::addition(10, TagSet::new(), "rage", 1).unwrap(),
        "gate",
        1,
    )
    .unwrap();
    assert_eq!(gated.to_string(), "if(..) +10.00");
}

// ============================================================================
// Snapshots
// ============================================================================

fn sample_numeric() -> Numeric {
    let mut numeric = Numeric::new(100).unwrap();
    numeric.add_modifier(Modifier::clamp(Some(0), Some(500), "cap").unwrap());
    numeric.add_modifier(
        Modifier::conditional(
            |_: &Numeric| true,
            Modifier::addition(5, TagSet::new(), "bonus", 1).unwrap(),
            "gate",
            1,
        )
        .unwrap(),
    );
    numeric.add_modifier(Modifier::addition(20, TagSet::from(["Equipment"]), "sword", 2).unwrap());
    numeric.add_modifier(
        Modifier::fraction(3, 2, FractionMode::Increase, TagSet::new(), "blessing", 1).unwrap(),
    );
    numeric
}

#[test]
fn test_snapshot_capture_order_and_payloads() {
    let snapshot = sample_numeric().all_modifiers();

    assert_eq!(snapshot.origin_value, 100 * fixed::SCALE);
    assert_eq!(snapshot.modifiers.len(), 4);

    // Ordinary entries come first, then constraints, then conditionals,
    // regardless of insertion order.
    assert_eq!(snapshot.modifiers[0].kind, ModifierKind::Addition);
    assert_eq!(snapshot.modifiers[0].name, "sword");
    assert_eq!(snapshot.modifiers[0].count, 2);
    assert_eq!(snapshot.modifiers[0].store_value, Some(20 * fixed::SCALE));

    assert_eq!(snapshot.modifiers[1].kind, ModifierKind::Fraction);
    assert_eq!(snapshot.modifiers[1].numerator, Some(3));
    assert_eq!(snapshot.modifiers[1].denominator, Some(2));
    assert_eq!(snapshot.modifiers[1].fraction_mode, Some(FractionMode::Increase));

    assert_eq!(snapshot.modifiers[2].kind, ModifierKind::Custom);
    assert_eq!(snapshot.modifiers[2].name, "cap");
    assert_eq!(snapshot.modifiers[2].store_value, None);

    assert_eq!(snapshot.modifiers[3].kind, ModifierKind::Conditional);
    assert_eq!(snapshot.modifiers[3].name, "gate");
}

#[test]
fn test_snapshot_persistable_filter() {
    let snapshot = sample_numeric().all_modifiers();

    let names: Vec<&str> = snapshot.persistable().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["sword", "blessing"]);
    assert!(snapshot.modifiers.iter().any(|m| !m.is_persistable()));
}

#[test]
fn test_snapshot_json_layout() {
    let snapshot = sample_numeric().all_modifiers();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["origin_value"], 100 * fixed::SCALE);

    let sword = &json["modifiers"][0];
    assert_eq!(sword["kind"], "Addition");
    assert_eq!(sword["name"], "sword");
    assert_eq!(sword["count"], 2);
    assert_eq!(sword["priority"], "Skill");
    assert_eq!(sword["tags"][0], "Equipment");
    assert_eq!(sword["store_value"], 20 * fixed::SCALE);

    // Fraction-only fields are omitted on addition rows, not null.
    assert!(sword.get("numerator").is_none());
    assert!(sword.get("fraction_mode").is_none());

    let blessing = &json["modifiers"][1];
    assert_eq!(blessing["kind"], "Fraction");
    assert_eq!(blessing["fraction_mode"], "Increase");
    assert!(blessing.get("store_value").is_none());
}

#[test]
fn test_snapshot_round_trip() {
    let snapshot = sample_numeric().all_modifiers();

    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: NumericSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn test_snapshot_is_a_deep_copy() {
    let mut numeric = sample_numeric();
    let snapshot = numeric.all_modifiers();

    numeric.clear();
    numeric.clear_constraints();
    numeric.clear_conditionals();
    assert_eq!(numeric.modifier_count(), 0);

    // The snapshot still holds everything it captured.
    assert_eq!(snapshot.modifiers.len(), 4);
    assert_eq!(snapshot.origin_value, 100 * fixed::SCALE);
}
