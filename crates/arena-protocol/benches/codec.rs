//! Codec benchmarks for arena-protocol.

use arena_protocol::{codec, ClientMessage};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn snapshot(tournaments: usize, players: usize) -> String {
    let list: Vec<serde_json::Value> = (0..tournaments)
        .map(|t| {
            let roster: Vec<serde_json::Value> = (0..players)
                .map(|p| serde_json::json!({"id": p, "username": format!("player{}", p)}))
                .collect();
            serde_json::json!({
                "id": t,
                "name": format!("Cup {}", t),
                "creator": {"id": 0, "username": "player0"},
                "players": roster,
                "started": t % 2 == 0,
            })
        })
        .collect();
    serde_json::json!({"type": "tournaments", "data": list}).to_string()
}

fn bench_encode_command(c: &mut Criterion) {
    let msg = ClientMessage::StartTournament { tournament: 42 };

    c.bench_function("encode_start_tournament", |b| {
        b.iter(|| codec::encode(black_box(&msg)))
    });
}

fn bench_decode_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_snapshot");
    for (tournaments, players) in [(10, 4), (100, 8)] {
        let text = snapshot(tournaments, players);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("{}x{}", tournaments, players), |b| {
            b.iter(|| codec::decode(black_box(&text)))
        });
    }
    group.finish();
}

fn bench_decode_countdown(c: &mut Criterion) {
    let text = r#"{"type":"countDown","time":3}"#;

    c.bench_function("decode_countdown", |b| {
        b.iter(|| codec::decode(black_box(text)))
    });
}

criterion_group!(
    benches,
    bench_encode_command,
    bench_decode_snapshot,
    bench_decode_countdown
);
criterion_main!(benches);
