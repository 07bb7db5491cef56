//! End-to-end pooling behavior through the orchestrator facade

use spawn_engine::prelude::*;

fn bullet_game() -> Orchestrator<SceneHost, MemoryAssets> {
    let assets = MemoryAssets::new()
        .with_template("Prefabs/Bullet", Prefab::new("Bullet"))
        .with_template("Prefabs/Rocket", Prefab::new("Rocket"))
        .with_template("Prefabs/UI/HealthBar", Prefab::new("HealthBar"));
    let mut game = Orchestrator::with_config(
        SceneHost::new(),
        assets,
        EngineConfig::new()
            .with_resources(ResourceConfig::default().with_search_path("Prefabs")),
    );
    game.initialize();
    game
}

#[test]
fn bullet_scenario_prewarm_spawn_despawn_shutdown() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));

    // Prewarm 3: pool holds 3 inert instances.
    game.prewarm("Bullet", 3, None);
    assert_eq!(game.free_count("Bullet"), 3);
    assert_eq!(game.host().created_count(), 3);

    // Spawn 5: the first 3 reuse prewarmed instances, 4-5 are created.
    let mut spawned = Vec::new();
    for _ in 0..5 {
        let instance = game
            .spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
            .expect("registered key must spawn");
        assert!(game.host().is_active(instance));
        spawned.push(instance);
    }
    assert_eq!(game.free_count("Bullet"), 0);
    assert_eq!(game.host().created_count(), 5);

    // All five are distinct live instances.
    let unique: std::collections::HashSet<_> = spawned.iter().copied().collect();
    assert_eq!(unique.len(), 5);

    // Despawn all 5: pool holds 5 inert instances.
    for &instance in &spawned {
        game.despawn(instance);
    }
    assert_eq!(game.free_count("Bullet"), 5);
    for &instance in &spawned {
        assert!(!game.host().is_active(instance));
        assert!(game.host().is_alive(instance));
    }

    // Shutdown: pool empty, all 5 destroyed.
    game.shutdown();
    assert_eq!(game.free_count("Bullet"), 0);
    assert_eq!(game.host().destroyed_count(), 5);
    assert_eq!(game.host().node_count(), 0);
}

#[test]
fn prewarmed_instances_are_returned_before_any_creation() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));
    game.prewarm("Bullet", 3, None);

    let baseline = game.host().created_count();
    for _ in 0..3 {
        game.spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
            .unwrap();
    }
    assert_eq!(game.host().created_count(), baseline, "first n spawns reuse");

    game.spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
        .unwrap();
    assert_eq!(
        game.host().created_count(),
        baseline + 1,
        "n+1-th spawn creates"
    );
}

#[test]
fn instances_never_cross_pool_partitions() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));
    game.register_prefab("Rocket", Prefab::new("Rocket"));

    let bullet = game
        .spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
        .unwrap();
    game.despawn(bullet);

    assert_eq!(game.free_count("Bullet"), 1);
    assert_eq!(game.free_count("Rocket"), 0);

    // The recycled instance comes back for its own key.
    let again = game
        .spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
        .unwrap();
    assert_eq!(again, bullet);
}

#[test]
fn unknown_key_spawn_returns_none() {
    let mut game = bullet_game();
    assert!(game
        .spawn("unknown-key", Vec3::zeros(), Quat::identity(), None, false, true)
        .is_none());
}

#[test]
fn unmanaged_despawn_destroys_without_corrupting_queues() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));
    game.prewarm("Bullet", 2, None);

    // Unpooled spawn goes through resource lookup, not the pool.
    let stray = game
        .spawn("Rocket", Vec3::zeros(), Quat::identity(), None, false, false)
        .expect("resource fallback resolves Rocket");

    game.despawn(stray);
    assert!(!game.host().is_alive(stray));
    assert_eq!(game.free_count("Bullet"), 2);
    assert_eq!(game.free_count("Rocket"), 0);
}

#[test]
fn bulk_registration_with_prewarm() {
    let mut game = bullet_game();
    let registered = game.register_all_in_path("Prefabs", 1, None);

    // Bullet, Rocket, and the nested UI/HealthBar.
    assert_eq!(registered, 3);
    assert_eq!(game.free_count("Bullet"), 1);
    assert_eq!(game.free_count("Rocket"), 1);
    assert_eq!(game.free_count("HealthBar"), 1);
}

#[test]
fn spawned_transform_is_applied() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));

    let position = Vec3::new(1.0, 2.0, 3.0);
    let instance = game
        .spawn("Bullet", position, Quat::identity(), None, true, true)
        .unwrap();
    assert_eq!(game.host().position(instance), Some(position));
}

#[test]
fn restart_after_shutdown_starts_clean() {
    let mut game = bullet_game();
    game.register_prefab("Bullet", Prefab::new("Bullet"));
    game.prewarm("Bullet", 4, None);
    game.shutdown();

    game.initialize();
    assert!(game.is_initialized());
    assert_eq!(game.free_count("Bullet"), 0);
    assert!(
        game.spawn("Bullet", Vec3::zeros(), Quat::identity(), None, false, true)
            .is_none(),
        "registrations do not survive shutdown"
    );
}
