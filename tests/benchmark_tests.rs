//! Performance benchmarks for the registry and the client mirror

use assert_approx_eq::assert_approx_eq;
use client::mirror::PlayerMirror;
use server::channel::Channel;
use server::registry::PlayerRegistry;
use shared::{KeyState, Player, PlayerId, ServerPacket, PLAYER_SPEED};
use std::cell::Cell;
use std::time::Instant;

/// Counts deliveries to `connections` peers without doing any I/O
struct CountingChannel {
    connections: usize,
    delivered: Cell<usize>,
}

impl CountingChannel {
    fn new(connections: usize) -> Self {
        Self {
            connections,
            delivered: Cell::new(0),
        }
    }
}

impl Channel for CountingChannel {
    fn emit(&self, _to: PlayerId, _packet: &ServerPacket) {
        self.delivered.set(self.delivered.get() + 1);
    }

    fn broadcast(&self, _from: PlayerId, _packet: &ServerPacket) {
        self.delivered
            .set(self.delivered.get() + self.connections.saturating_sub(1));
    }

    fn emit_all(&self, _packet: &ServerPacket) {
        self.delivered.set(self.delivered.get() + self.connections);
    }
}

/// Benchmarks joining many players, each receiving the full catch-up stream
#[test]
fn benchmark_registry_join() {
    let players = 500u32;
    let channel = CountingChannel::new(players as usize);
    let mut registry = PlayerRegistry::new();

    let start = Instant::now();
    for id in 1..=players {
        registry.on_join(&channel, PlayerId(id), id as f32, 0.0);
    }
    let duration = start.elapsed();

    println!(
        "Registry join: {} players in {:?} ({:.2} μs/join)",
        players,
        duration,
        duration.as_micros() as f64 / players as f64
    );

    assert_eq!(registry.len(), players as usize);
    // One broadcast per join plus n(n-1)/2 catch-up announcements
    let n = players as usize;
    assert_eq!(channel.delivered.get(), n * (n - 1) + n * (n - 1) / 2);
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks relaying moves through a populated registry
#[test]
fn benchmark_registry_move() {
    let channel = CountingChannel::new(64);
    let mut registry = PlayerRegistry::new();
    for id in 1..=64 {
        registry.on_join(&channel, PlayerId(id), 0.0, 0.0);
    }

    let iterations = 100_000u32;
    let start = Instant::now();

    for i in 0..iterations {
        let id = PlayerId(i % 64 + 1);
        registry.on_move(&channel, id, i as f32, i as f32);
    }

    let duration = start.elapsed();
    println!(
        "Registry move: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks the per-frame local update plus remote cache churn
#[test]
fn benchmark_mirror_updates() {
    let mut mirror = PlayerMirror::new(Player::new(0.0, 0.0));
    let keys = KeyState::new(false, false, true, true);

    let frames = 100_000;
    let start = Instant::now();

    for frame in 0..frames {
        mirror.update(&keys);

        let id = PlayerId(frame % 32);
        mirror.apply(ServerPacket::NewPlayer { id, x: 0.0, y: 0.0 });
        mirror.apply(ServerPacket::MovePlayer {
            id,
            x: frame as f32,
            y: 0.0,
        });
        if frame % 3 == 0 {
            mirror.apply(ServerPacket::RemovePlayer { id });
        }
    }

    let duration = start.elapsed();
    println!(
        "Mirror frame: {} frames in {:?} ({:.2} ns/frame)",
        frames,
        duration,
        duration.as_nanos() as f64 / frames as f64
    );

    assert_approx_eq!(mirror.local().x, frames as f32 * PLAYER_SPEED, 1.0);
    assert!(duration.as_millis() < 2000);
}
