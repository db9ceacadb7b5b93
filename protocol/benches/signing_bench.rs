// Benchmarks for the HEAT crypto layer.
//
// Covers phrase key derivation, signing and verification, envelope
// encryption at a few payload sizes, and the account address codec.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use heat_crypto::address::AddressCodec;
use heat_crypto::crypto::encryption::{decrypt, encrypt};
use heat_crypto::crypto::keys::KeyPair;
use heat_crypto::crypto::signatures::{sign, verify};

const PHRASE: &str = "correct horse battery staple";

fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("keys/from_phrase", |b| {
        b.iter(|| KeyPair::from_phrase(black_box(PHRASE)));
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let message = b"transfer 500 HEAT to HEAT-2222-2222-2222-22222";

    c.bench_function("kcdsa/sign_message", |b| {
        b.iter(|| sign(black_box(message), PHRASE).unwrap());
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let pair = KeyPair::from_phrase(PHRASE);
    let message = b"transfer 500 HEAT to HEAT-2222-2222-2222-22222";
    let signature = pair.sign(message).unwrap();
    let public_key = pair.public_key();

    c.bench_function("kcdsa/verify_signature", |b| {
        b.iter(|| verify(&signature, black_box(message), &public_key, true));
    });
}

fn bench_envelope(c: &mut Criterion) {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");
    let mut group = c.benchmark_group("channel/roundtrip");

    for size in [64usize, 1024, 16 * 1024] {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                let sealed = encrypt(payload, alice.private_key(), &bob.public_key()).unwrap();
                decrypt(&sealed, bob.private_key(), &alice.public_key()).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_address_codec(c: &mut Criterion) {
    let codec = AddressCodec::new();
    let id = 8_149_285_732_391_520_456u64;
    let text = codec.encode(id);

    c.bench_function("address/encode", |b| b.iter(|| codec.encode(black_box(id))));
    c.bench_function("address/decode", |b| b.iter(|| codec.decode(black_box(&text)).unwrap()));
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_sign_message,
    bench_verify_signature,
    bench_envelope,
    bench_address_codec,
);
criterion_main!(benches);
