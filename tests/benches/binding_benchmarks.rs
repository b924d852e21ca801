//! # Signature Binding Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | MetaData encode + decode | < 10µs |
//! | sign_root (secp256k1 / Ed25519) | < 1ms |
//! | verify_all, 2..64 signers | scales sub-linearly (rayon) |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lf_01_signature_binding::{
    decode, encode, sign, verify_all, ExtraMetaData, MetaData, SignatureBinder,
    SignatureBindingApi,
};
use shared_crypto::KeyPair;
use shared_types::{PublicKeyHandle, SecureHash, SignatureScheme};
use std::collections::BTreeSet;
use std::time::Duration;

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("lf-01-codec");
    let key = KeyPair::generate(SignatureScheme::EddsaEd25519);
    let metadata = MetaData::with_extra(
        SecureHash::sha256(b"root"),
        key.public_key(),
        ExtraMetaData::new(1)
            .with_timestamp(1_700_000_000_000)
            .with_auxiliary("origin", b"bench".to_vec()),
    );
    let bytes = encode(&metadata).unwrap_or_default();

    group.bench_function("encode", |b| b.iter(|| black_box(encode(&metadata))));
    group.bench_function("decode", |b| b.iter(|| black_box(decode(&bytes))));
    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("lf-01-sign");
    let binder = SignatureBinder::new(1);
    let root = SecureHash::sha256(b"transaction");

    for scheme in [SignatureScheme::EcdsaSecp256k1Sha256, SignatureScheme::EddsaEd25519] {
        let key = KeyPair::generate(scheme);
        group.bench_with_input(BenchmarkId::new("sign_root", format!("{scheme:?}")), &key, |b, key| {
            b.iter(|| black_box(binder.sign_root(key, root)))
        });
    }
    group.finish();
}

fn bench_verify_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("lf-01-verify-all");
    group.measurement_time(Duration::from_secs(10));
    let root = SecureHash::sha256(b"multi-party");

    for signers in [2usize, 8, 32, 64] {
        let keys: Vec<KeyPair> = (0..signers)
            .map(|_| KeyPair::generate(SignatureScheme::EcdsaSecp256k1Sha256))
            .collect();
        let required: BTreeSet<PublicKeyHandle> = keys.iter().map(KeyPair::public_key).collect();
        let signatures: Vec<_> = keys
            .iter()
            .filter_map(|k| sign(k, MetaData::new(1, root, k.public_key())).ok())
            .collect();

        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &signatures, |b, sigs| {
            b.iter(|| black_box(verify_all(&root, &required, sigs)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_sign, bench_verify_all);
criterion_main!(benches);
