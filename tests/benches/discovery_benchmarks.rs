//! # Peer-SD Domain Benchmarks
//!
//! | Operation | Workload |
//! |-----------|----------|
//! | Multi-address parsing | dns4 / ip4 / ip6 forms |
//! | Address ordering | 16 mixed hostnames and IPs |
//! | Peer combination | 4 sources x 2000 peers, 50% overlap |

use std::collections::HashMap;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use psd_discovery::test_utils::{advertised, diagnostics};
use psd_discovery::{classify_order, combine_peers, parse_multi_address, DiagnosticsRecord};

fn bench_parse_multi_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse-multi-address");

    for (name, input) in [
        ("dns4", "/dns4/bootstrap-0.example.com/tcp/3919/ipfs/16Uiu2HAm"),
        ("ip4", "/ip4/203.0.113.7/tcp/3919"),
        ("ip6", "/ip6/2001:db8::1/tcp/3919"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| parse_multi_address(black_box(input)))
        });
    }
    group.finish();
}

fn bench_classify_order(c: &mut Criterion) {
    let addresses: Vec<String> = (0..16)
        .map(|i| match i % 4 {
            0 => format!("host-{i}.example.com"),
            1 => format!("203.0.113.{i}"),
            2 => format!("10.0.0.{i}"),
            _ => format!("2001:db8::{i:x}"),
        })
        .collect();

    c.bench_function("classify-order-16", |b| {
        b.iter(|| classify_order(black_box(addresses.iter())))
    });
}

fn source_records(sources: usize, peers: usize) -> Vec<DiagnosticsRecord> {
    (0..sources)
        .map(|s| {
            let offset = s * peers / 2;
            let connected = (offset..offset + peers)
                .map(|p| {
                    let multiaddr = format!("/dns4/host-{p}.example.com/tcp/3919");
                    advertised(&format!("0x{p:040x}"), &format!("net-{p}"), &[&multiaddr])
                })
                .collect();
            diagnostics(&format!("boot-{s}"), connected)
        })
        .collect()
}

fn bench_combine_peers(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine-peers");
    group.measurement_time(Duration::from_secs(10));

    let previous = HashMap::new();
    for peers in [200usize, 2000] {
        let records = source_records(4, peers);
        group.throughput(Throughput::Elements((4 * peers) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(peers), &records, |b, records| {
            b.iter(|| combine_peers(black_box(records), &previous))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_multi_address,
    bench_classify_order,
    bench_combine_peers
);
criterion_main!(benches);
