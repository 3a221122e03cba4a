use coffer::{ChunkedReader, ChunkedWriter, CofferError, Params, KEY_LEN};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_params() -> Params {
    let mut params = Params::default();
    params.check().unwrap();
    params
}

fn seal(key: &[u8; KEY_LEN], params: &Params, plaintext: &[u8]) -> Vec<u8> {
    let mut sealed = Vec::with_capacity(plaintext.len() + plaintext.len() / 1024);
    let mut writer = ChunkedWriter::new(key, &mut sealed, params).unwrap();
    writer.write(plaintext).unwrap();
    writer.close().unwrap();
    sealed
}

/// Chunked sealing throughput at different payload sizes.
fn bench_seal(c: &mut Criterion) {
    let mut group = c.benchmark_group("seal");
    let key = [7u8; KEY_LEN];
    let params = bench_params();

    for size in [64 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let plaintext = vec![42u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}KiB", size / 1024)),
            &plaintext,
            |b, plaintext| {
                b.iter(|| seal(&key, &params, plaintext));
            },
        );
    }
    group.finish();
}

/// Chunked opening throughput at different payload sizes.
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    let key = [7u8; KEY_LEN];
    let params = bench_params();

    for size in [64 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let sealed = seal(&key, &params, &vec![42u8; size]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}KiB", size / 1024)),
            &sealed,
            |b, sealed| {
                b.iter(|| {
                    let mut reader =
                        ChunkedReader::new(&key, sealed.as_slice(), &params).unwrap();
                    let mut buf = vec![0u8; 64 * 1024];
                    let mut total = 0usize;
                    loop {
                        match reader.read(&mut buf) {
                            Ok(n) => total += n,
                            Err(CofferError::EndOfStream) => break,
                            Err(err) => panic!("open failed: {err}"),
                        }
                    }
                    total
                });
            },
        );
    }
    group.finish();
}

/// Header marshal/parse cost, which bounds per-container overhead.
fn bench_header(c: &mut Criterion) {
    let mut params = Params {
        salt: Some(vec![7u8; 16]),
        ..Params::default()
    };
    let header = params.marshal_header().unwrap();

    c.bench_function("header_parse", |b| {
        b.iter(|| Params::parse_header(&mut header.as_slice()).unwrap());
    });
}

criterion_group!(benches, bench_seal, bench_open, bench_header);
criterion_main!(benches);
