// tests/robot_catalog.rs
use modular_configurator::{
    CatalogDocument, ConfigurationIndex, ResolutionRule, Resolver, ToggleDirection, desired_set,
    is_subset, module_set,
};

fn load() -> CatalogDocument {
    CatalogDocument::from_json_str(include_str!("fixtures/robot_catalog.json")).unwrap()
}

#[test]
fn test_fixture_is_valid_content() {
    let doc = load();
    assert_eq!(doc.modules.len(), 7);
    assert_eq!(doc.configurations.len(), 38);
    doc.validate().unwrap();
}

#[test]
fn test_exact_match_always_wins() {
    let doc = load();
    let index = ConfigurationIndex::build(&doc.configurations);
    let resolver = Resolver::new(&index);

    for active in index.iter() {
        for module in doc.modules.ids() {
            let (desired, _) = desired_set(&active.module_set, module);
            let Some(exact) = index.iter().find(|cfg| cfg.module_set == desired) else {
                continue;
            };
            let resolution = resolver.resolve_toggle(&active.module_set, module).unwrap();
            assert_eq!(resolution.rule, ResolutionRule::Exact);
            assert_eq!(resolution.configuration.id, exact.id, "{} / {module}", active.id);
        }
    }
}

#[test]
fn test_superset_is_minimal_and_subset_is_maximal() {
    let doc = load();
    let index = ConfigurationIndex::build(&doc.configurations);
    let resolver = Resolver::new(&index);
    let mut checked = 0;

    for active in index.iter() {
        for module in doc.modules.ids() {
            let (desired, direction) = desired_set(&active.module_set, module);
            let resolution = resolver.resolve_toggle(&active.module_set, module).unwrap();
            let chosen = resolution.configuration;

            match resolution.rule {
                ResolutionRule::MinimalSuperset => {
                    assert_eq!(direction, ToggleDirection::On);
                    assert!(is_subset(&desired, &chosen.module_set));
                    assert!(chosen.size > desired.len());
                    assert!(
                        index
                            .iter()
                            .filter(|cfg| is_subset(&desired, &cfg.module_set))
                            .all(|cfg| cfg.size >= chosen.size)
                    );
                    checked += 1;
                }
                ResolutionRule::MaximalSubset => {
                    assert_eq!(direction, ToggleDirection::Off);
                    assert!(is_subset(&chosen.module_set, &desired));
                    assert!(chosen.size < desired.len());
                    assert!(
                        index
                            .iter()
                            .filter(|cfg| is_subset(&cfg.module_set, &desired))
                            .all(|cfg| cfg.size <= chosen.size)
                    );
                    checked += 1;
                }
                _ => {}
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn test_known_resolutions() {
    let doc = load();
    let index = ConfigurationIndex::build(&doc.configurations);
    let resolver = Resolver::new(&index);

    // Chest on top of base + torso + arms only exists with the speaker.
    let r = resolver
        .resolve_toggle(&module_set(["base", "torso", "arms"]), "chest")
        .unwrap();
    assert_eq!(r.configuration.id, "base-torso-chest-arms-speaker");
    assert_eq!(r.rule, ResolutionRule::MinimalSuperset);

    // Dropping the speaker from it cannot keep the chest.
    let r = resolver
        .resolve_toggle(
            &module_set(["base", "torso", "chest", "arms", "speaker"]),
            "speaker",
        )
        .unwrap();
    assert_eq!(r.configuration.id, "base-torso-arms");
    assert_eq!(r.rule, ResolutionRule::MaximalSubset);

    // Removing the base swaps in the stand.
    let r = resolver
        .resolve_toggle(&module_set(["base", "head"]), "base")
        .unwrap();
    assert_eq!(r.configuration.id, "stand-head");
    assert_eq!(r.rule, ResolutionRule::ClosestFallback);

    // And adding it back swaps the stand out.
    let r = resolver
        .resolve_toggle(&module_set(["stand", "torso"]), "base")
        .unwrap();
    assert_eq!(r.configuration.id, "base-torso");
    assert_eq!(r.rule, ResolutionRule::ClosestFallback);
}

#[test]
fn test_every_control_is_reachable() {
    let doc = load();
    let index = ConfigurationIndex::build(&doc.configurations);
    let resolver = Resolver::new(&index);

    for active in index.iter() {
        for module in doc.modules.ids() {
            let state = resolver.toggle_state(&active.id, &active.module_set, module);
            assert!(!state.disabled, "{} / {module}", active.id);
        }
    }
}

#[test]
fn test_stand_configurations_mirror_base_ones() {
    let doc = load();
    let stand = doc
        .configurations
        .get("stand-torso-chest-arms-head")
        .unwrap();
    assert_eq!(stand.name, "Full Configuration (Stand)");
    assert_eq!(
        stand.module_set(),
        module_set(["stand", "torso", "chest", "arms", "head"])
    );
}
