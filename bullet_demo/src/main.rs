//! Bullet pooling demo
//!
//! Walks the pooling engine through its intended usage: register a
//! prefab, prewarm its pool, fire a volley of spawns (the first few
//! reuse prewarmed instances, the rest are created on demand), return
//! everything to the pool, and shut down.

use spawn_engine::prelude::*;

fn main() {
    spawn_engine::foundation::logging::init();

    log::info!("Creating bullet demo...");
    let assets = MemoryAssets::new()
        .with_template("Prefabs/Bullet", Prefab::new("Bullet"))
        .with_template("Prefabs/MuzzleFlash", Prefab::new("MuzzleFlash"));

    let config = EngineConfig::new()
        .with_resources(ResourceConfig::default().with_search_path("Prefabs"))
        .with_pool(PoolConfig::default().with_prewarm("Bullet", 3));

    let mut game = Orchestrator::with_config(SceneHost::new(), assets, config);
    game.register_prefab("Bullet", Prefab::new("Bullet"));
    game.initialize();
    log::info!(
        "Initialized; {} bullets prewarmed",
        game.free_count("Bullet")
    );

    // Fire a volley of five. Three reuse prewarmed instances, two are
    // created on demand.
    let muzzle = game.host_mut().create_container("Muzzle");
    let mut volley = Vec::new();
    for i in 0..5 {
        let position = Vec3::new(i as f32 * 0.5, 1.0, 0.0);
        if let Some(bullet) = game.spawn("Bullet", position, Quat::identity(), Some(muzzle), false, true)
        {
            volley.push(bullet);
        }
    }
    let stats = game.pool_stats();
    log::info!(
        "Fired {} bullets ({} created, {} spawned)",
        volley.len(),
        stats.total_created,
        stats.total_spawned
    );

    // One unmanaged effect: instantiated directly, destroyed on despawn.
    if let Some(flash) = game.spawn("MuzzleFlash", Vec3::zeros(), Quat::identity(), None, true, false)
    {
        game.despawn(flash);
        log::info!("Muzzle flash spawned unmanaged and destroyed");
    }

    // Return the volley to the pool.
    for bullet in volley {
        game.despawn(bullet);
    }
    log::info!(
        "Volley returned; {} bullets pooled",
        game.free_count("Bullet")
    );

    game.shutdown();
    let (created, destroyed) = (
        game.host().created_count(),
        game.host().destroyed_count(),
    );
    log::info!("Shutdown complete: {created} instances created, {destroyed} destroyed");
}
