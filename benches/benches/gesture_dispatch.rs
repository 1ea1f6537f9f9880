// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_gesture::config::Configuration;
use understory_gesture::input::{Channels, EventSource, InputEvent};
use understory_gesture::registry::Gestures;

struct NullHost;

impl EventSource<u32> for NullHost {
    fn subscribe(&mut self, _node: u32, _channels: Channels) {}
    fn unsubscribe(&mut self, _node: u32, _channels: Channels) {}
}

/// Press/release pairs every `gap` ms across `nodes` nodes, round robin.
fn gen_clicks(count: usize, nodes: u32, gap: f64) -> Vec<(u32, InputEvent)> {
    let mut out = Vec::with_capacity(count * 2);
    for i in 0..count {
        #[allow(clippy::cast_possible_truncation, reason = "bench sizes are small")]
        let node = (i as u32) % nodes;
        let t = i as f64 * gap;
        out.push((node, InputEvent::mouse_down(t)));
        out.push((node, InputEvent::mouse_up(t + gap * 0.25)));
    }
    out
}

fn registry(nodes: u32, tokens: &[&str]) -> Gestures<u32, NullHost> {
    let mut g = Gestures::new(NullHost);
    for n in 0..nodes {
        g.attach(n, Configuration::resolve(tokens.iter().copied(), None));
    }
    g
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_dispatch");
    let events = gen_clicks(10_000, 64, 40.0);
    group.throughput(Throughput::Elements(events.len() as u64));

    for tokens in [
        &["single"][..],
        &["double"][..],
        &["hold", "20"][..],
        &["press", "throttle"][..],
        &["release", "debounce"][..],
    ] {
        group.bench_function(tokens.join("+"), |b| {
            b.iter_batched(
                || registry(64, tokens),
                |mut g| {
                    for (node, event) in &events {
                        g.advance(event.time);
                        black_box(g.handle_event(*node, event));
                    }
                    g
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gestures);
criterion_main!(benches);
