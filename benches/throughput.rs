//! Throughput Benchmark for reqdispatch
//!
//! Measures registry lookups, full dispatches, and request line parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use reqdispatch::handler::{handler_fn, EchoHandler, PingHandler, SharedHandler};
use reqdispatch::protocol::parse_request_line;
use reqdispatch::registry::HandlerRegistry;
use reqdispatch::RequestManager;
use std::sync::Arc;
use std::time::Duration;

fn numbered_handlers(count: usize) -> Vec<SharedHandler> {
    (0..count)
        .map(|i| {
            handler_fn(format!("Request{}", i), |payload, _cancel| async move { Ok(payload) })
                as SharedHandler
        })
        .collect()
}

/// Benchmark registry lookups
fn bench_lookup(c: &mut Criterion) {
    let registry = HandlerRegistry::new(numbered_handlers(1_000)).unwrap();

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));

    group.bench_function("lookup_existing", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let name = format!("request{}", i % 1_000);
            black_box(registry.lookup(&name));
            i += 1;
        });
    });

    group.bench_function("lookup_missing", |b| {
        b.iter(|| black_box(registry.lookup("DoesNotExist")));
    });

    group.finish();
}

/// Benchmark full dispatches on a current-thread runtime
fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let manager = RequestManager::new(
        vec![
            Arc::new(PingHandler) as SharedHandler,
            Arc::new(EchoHandler) as SharedHandler,
        ],
        Duration::from_secs(60),
    )
    .unwrap();

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("dispatch_ping", |b| {
        b.iter(|| runtime.block_on(manager.process_request("ping", None)));
    });

    group.bench_function("dispatch_echo_1kb", |b| {
        let payload = "x".repeat(1024);
        b.iter(|| runtime.block_on(manager.process_request("echo", Some(&payload))));
    });

    group.bench_function("dispatch_unknown", |b| {
        b.iter(|| runtime.block_on(manager.process_request("missing", None)));
    });

    group.finish();
}

/// Benchmark request line parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_name_only", |b| {
        b.iter(|| black_box(parse_request_line(black_box(b"ping\r\n"))));
    });

    let line = format!("echo {}\n", "{\"k\":\"v\"}".repeat(64));
    group.bench_function("parse_with_payload", |b| {
        b.iter(|| black_box(parse_request_line(black_box(line.as_bytes()))));
    });

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_dispatch, bench_parse);
criterion_main!(benches);
