/*
 * Clear Path Boids
 *
 * Interactive viewer for the boid simulation. Boids flock, avoid each other
 * and obstacles, and head for a shared destination. The control panel edits
 * their settings live; right click places actors, obstacles or the destination.
 *
 * Set RUST_LOG (e.g. RUST_LOG=clearpath_boids=debug) to see the simulation logs.
 */

fn main() {
    init_tracing();
    clearpath_boids::app::run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
