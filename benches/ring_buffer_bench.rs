//! Performance benchmarks for the UART receive path.
//!
//! Measures ring buffer writes (including the overwrite path) and the
//! per-cycle drain through the UART command accumulator.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench ring_buffer_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use doorlock_core::constants::UART_RING_BUFFER_SIZE;
use doorlock_core::{CommandAccumulator, RingBuffer};
use std::hint::black_box;

/// Benchmark single-byte writes into a buffer that is already full.
fn bench_write_overwrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_write");
    group.throughput(Throughput::Elements(1));

    let mut rb = RingBuffer::<UART_RING_BUFFER_SIZE>::new().unwrap();
    rb.write_slice(&[b'x'; UART_RING_BUFFER_SIZE]);

    group.bench_function("write_when_full", |b| {
        b.iter(|| {
            rb.write(black_box(b'y'));
        });
    });

    group.finish();
}

/// Benchmark draining a full cycle's worth of bytes into commands.
fn bench_process_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("uart_process");

    for lines in [1usize, 4, 12] {
        let payload: Vec<u8> = b"1234\r".repeat(lines);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(lines), &payload, |b, payload| {
            b.iter(|| {
                let mut rb = RingBuffer::<UART_RING_BUFFER_SIZE>::new().unwrap();
                let mut acc = CommandAccumulator::uart();
                rb.write_slice(payload);
                black_box(acc.process(&mut rb));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write_overwrite, bench_process_lines);

criterion_main!(benches);
