use std::collections::HashMap;
use std::hint::black_box;

use criterion::{
    criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use bgpstream_core::hash::KeyHashMap;
use bgpstream_core::values::{AsNumber, Ipv4Address, Ipv4Prefix, PfxStorage};
use bgpstream_core::KeyHash;

const PREFIXES_NUM: u32 = 1 << 16;

// Neighbouring /24s, the worst case for an unmixed hash.
fn adjacent_prefixes(count: u32) -> Vec<PfxStorage> {
    (0..count)
        .filter_map(|i| {
            let addr = Ipv4Address::from(std::net::Ipv4Addr::from(
                0x0a00_0000_u32 + (i << 8),
            ));
            Ipv4Prefix::new(addr, 24).ok().map(PfxStorage::from)
        })
        .collect()
}

fn bench_key_hash(c: &mut Criterion) {
    let pfxs = adjacent_prefixes(PREFIXES_NUM);
    let asns: Vec<AsNumber> = (0..PREFIXES_NUM).map(AsNumber::from).collect();

    let mut group = c.benchmark_group("key_hash");
    group.throughput(Throughput::Elements(pfxs.len() as u64));
    group.bench_function("prefix", |b| {
        b.iter(|| pfxs.iter().fold(0_u64, |acc, p| acc ^ p.key_hash()))
    });
    group.bench_function("as_number", |b| {
        b.iter(|| asns.iter().fold(0_u64, |acc, a| acc ^ a.key_hash()))
    });
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_prefixes");
    for count in [1 << 10, 1 << 14, PREFIXES_NUM] {
        let pfxs = adjacent_prefixes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("KeyHashMap", count),
            &pfxs,
            |b, pfxs| {
                b.iter(|| {
                    let mut map = KeyHashMap::default();
                    for (i, pfx) in pfxs.iter().enumerate() {
                        map.insert(*pfx, i);
                    }
                    black_box(map.len())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("HashMap", count),
            &pfxs,
            |b, pfxs| {
                b.iter(|| {
                    let mut map = HashMap::new();
                    for (i, pfx) in pfxs.iter().enumerate() {
                        map.insert(*pfx, i);
                    }
                    black_box(map.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_key_hash, bench_insert);
criterion_main!(benches);
