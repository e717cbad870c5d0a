use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use varstream::{varint, RecordFramer, RecordWriter};

// Test data generation utilities
fn create_test_messages(count: usize, len: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            let mut msg = format!("benchmark message number {}", i).into_bytes();
            msg.resize(len, b'.');
            msg
        })
        .collect()
}

fn build_stream(messages: &[Vec<u8>]) -> Vec<u8> {
    let mut writer = RecordWriter::new(Vec::new());
    writer.write_all_records(messages).unwrap();
    writer.into_inner()
}

// Benchmark configuration
const SMALL_MESSAGE_COUNT: usize = 1000;
const LARGE_MESSAGE_COUNT: usize = 50;

fn benchmark_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    for value in [1u64, 300, u32::MAX as u64, u64::MAX] {
        let bytes = varint::encode(value);
        group.bench_with_input(BenchmarkId::new("decode", value), &bytes, |b, bytes| {
            b.iter(|| varint::decode(black_box(bytes)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("encode", value), &value, |b, &value| {
            let mut out = Vec::with_capacity(varint::MAX_VARINT_LEN);
            b.iter(|| {
                out.clear();
                varint::encode_into(black_box(value), &mut out);
            })
        });
    }
    group.finish();
}

/// Read throughput of small records across working buffer sizes.
fn benchmark_read_small_records(c: &mut Criterion) {
    let stream = build_stream(&create_test_messages(SMALL_MESSAGE_COUNT, 64));
    let mut group = c.benchmark_group("read_small_records");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for capacity in [64usize, 4096, varstream::DEFAULT_CAPACITY] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &stream, |b, stream| {
            b.iter(|| {
                let mut framer =
                    RecordFramer::with_capacity(Cursor::new(stream.as_slice()), capacity).unwrap();
                let mut total = 0usize;
                framer
                    .process_all(|payload, _span| {
                        total += payload.len();
                        Ok(())
                    })
                    .unwrap();
                black_box(total)
            })
        });
    }
    group.finish();
}

/// Records much larger than the buffer, forcing multi-refill requests.
fn benchmark_read_large_records(c: &mut Criterion) {
    let stream = build_stream(&create_test_messages(LARGE_MESSAGE_COUNT, 256 * 1024));
    let mut group = c.benchmark_group("read_large_records");
    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.sample_size(20);

    group.bench_function("default_capacity", |b| {
        b.iter(|| {
            let mut framer = RecordFramer::new(Cursor::new(stream.as_slice()));
            let mut count = 0usize;
            while framer.advance().unwrap() {
                count += 1;
            }
            black_box(count)
        })
    });
    group.finish();
}

fn benchmark_write(c: &mut Criterion) {
    let messages = create_test_messages(SMALL_MESSAGE_COUNT, 64);
    let total_bytes: usize = messages.iter().map(|m| m.len()).sum();
    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(total_bytes as u64));

    group.bench_function("write_1000_records", |b| {
        let mut buffer = Vec::with_capacity(total_bytes * 2);
        b.iter(|| {
            buffer.clear();
            let mut writer = RecordWriter::new(&mut buffer);
            writer.write_all_records(&messages).unwrap();
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_varint,
    benchmark_read_small_records,
    benchmark_read_large_records,
    benchmark_write,
);

criterion_main!(benches);
