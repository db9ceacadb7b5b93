//! End-to-end tests for the HEAT crypto layer.
//!
//! These walk the paths a wallet or node actually takes: derive keys from a
//! phrase, sign and verify, open a private channel to a peer, and print or
//! parse an account address. The property tests at the bottom hammer the
//! round-trip and tamper-detection guarantees with random inputs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use heat_crypto::address::{account_id_from_public_key, parse_account_id, rs_account, AddressCodec};
use heat_crypto::crypto::encryption::{decrypt, encrypt, SecureChannel, ZERO_NONCE};
use heat_crypto::crypto::keys::{derive_private_key, derive_public_key, KeyPair};
use heat_crypto::crypto::signatures::{sign, verify, Signature, SignatureScheme};
use heat_crypto::CryptoError;

const PHRASE: &str = "correct horse battery staple";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[test]
fn phrase_identity_is_stable() {
    let a = KeyPair::from_phrase(PHRASE);
    let b = KeyPair::from_phrase(PHRASE);

    assert_eq!(a.public_key(), b.public_key());
    assert_eq!(a.private_key().as_bytes(), b.private_key().as_bytes());
    assert_eq!(derive_public_key(PHRASE), a.public_key());
    assert_eq!(derive_private_key(PHRASE).as_bytes(), a.private_key().as_bytes());
}

#[test]
fn known_phrase_regression_values() {
    let pair = KeyPair::from_phrase(PHRASE);
    assert_eq!(
        pair.public_key().to_hex(),
        "8f14527a1df1ed2b418adf4c9bc71a9aed4e742836f5c5a9c70158bb6bcdc777"
    );
    assert_eq!(
        hex::encode(pair.private_key().as_bytes()),
        "c0bbcb1fbec99d65bf59d85c8cb62ee2db963f0fe106f483d9afa73bd4e39a4a"
    );
    assert_eq!(
        sign(b"hello", PHRASE).unwrap().to_hex(),
        "cdee003c41628b96dbe08faf5637e77bb1384b1509b0023247d1a29c521d550b\
         eddd48ab1668f7c3e925b75b78c15be04ea578301a19edacb5ea7ee6be6cf159"
    );
    assert_eq!(rs_account(pair.account_id()), "HEAT-YLZN-8DAS-R3V8-CQ6N4");
}

#[test]
fn address_error_taxonomy() {
    let codec = AddressCodec::new();
    let text = codec.encode(42);

    let mut symbol_changed = text.clone().into_bytes();
    symbol_changed[0] = if symbol_changed[0] == b'2' { b'3' } else { b'2' };
    let symbol_changed = String::from_utf8(symbol_changed).unwrap();
    assert!(matches!(
        codec.decode(&symbol_changed),
        Err(CryptoError::MalformedAddress { .. })
    ));

    let separator_moved = text.replacen('-', "", 1);
    let separator_moved = format!("{}-{}", &separator_moved[..5], &separator_moved[5..]);
    assert_eq!(
        codec.decode(&separator_moved),
        Err(CryptoError::ChecksumMismatch {
            address: separator_moved.clone(),
            decoded: 42,
        })
    );
}

#[test]
fn account_address_follows_public_key() {
    let pair = KeyPair::from_phrase(PHRASE);
    let id = account_id_from_public_key(&pair.public_key());
    let address = rs_account(id);

    assert_eq!(parse_account_id(&address).unwrap(), id);
    assert_eq!(parse_account_id(&id.to_string()).unwrap(), id);
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

#[test]
fn sign_then_verify_across_api_surfaces() {
    let pair = KeyPair::from_phrase(PHRASE);
    let message = b"hello";

    let by_phrase = sign(message, PHRASE).unwrap();
    let by_pair = pair.sign(message).unwrap();
    assert_eq!(by_phrase, by_pair);
    assert_eq!(sign(message, PHRASE).unwrap(), by_phrase);

    assert!(verify(&by_phrase, message, &pair.public_key(), true));
    assert!(pair.public_key().verify(message, &by_phrase));

    let scheme = SignatureScheme::new();
    assert!(scheme.verify_bytes(
        by_phrase.as_bytes(),
        message,
        pair.public_key().as_bytes(),
        true
    ));
}

#[test]
fn signature_survives_hex_and_json_transport() {
    let pair = KeyPair::from_phrase(PHRASE);
    let signature = pair.sign(b"transfer 10 HEAT").unwrap();

    let from_hex = Signature::from_hex(&signature.to_hex()).unwrap();
    assert_eq!(from_hex, signature);

    let json = serde_json::to_string(&signature).unwrap();
    let from_json: Signature = serde_json::from_str(&json).unwrap();
    assert!(verify(&from_json, b"transfer 10 HEAT", &pair.public_key(), true));
}

#[test]
fn signature_from_other_identity_is_rejected() {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");
    let signature = alice.sign(b"pay bob").unwrap();

    assert!(!verify(&signature, b"pay bob", &bob.public_key(), true));
    assert!(!verify(&signature, b"pay bob", &bob.public_key(), false));
}

// ---------------------------------------------------------------------------
// Secure channel
// ---------------------------------------------------------------------------

#[test]
fn private_message_between_peers() {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");

    let envelope = encrypt(b"see you at block 1000", alice.private_key(), &bob.public_key()).unwrap();
    let opened = decrypt(&envelope, bob.private_key(), &alice.public_key()).unwrap();
    assert_eq!(opened, b"see you at block 1000");

    // Alice can read her own outbox too; ECDH is symmetric.
    let own = decrypt(&envelope, alice.private_key(), &bob.public_key()).unwrap();
    assert_eq!(own, opened);
}

#[test]
fn shared_secret_agrees_with_channel() {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");
    assert_eq!(alice.shared_secret(&bob.public_key()), bob.shared_secret(&alice.public_key()));
}

#[test]
fn truncated_envelope_is_invalid() {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");
    let envelope = encrypt(b"payload", alice.private_key(), &bob.public_key()).unwrap();

    let err = decrypt(&envelope[..envelope.len() - 1], bob.private_key(), &alice.public_key())
        .unwrap_err();
    assert_eq!(err, CryptoError::InvalidCiphertext);
}

#[test]
fn seeded_channel_is_reproducible_end_to_end() {
    let alice = KeyPair::from_phrase("alice");
    let bob = KeyPair::from_phrase("bob");
    let channel = SecureChannel::new();

    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        channel
            .encrypt_with_rng(&mut rng, b"simulated", alice.private_key(), &bob.public_key(), &ZERO_NONCE)
            .unwrap()
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_sign_verify_roundtrip(
        phrase in "[a-z ]{1,40}",
        message in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let signature = sign(&message, &phrase).unwrap();
        prop_assert!(verify(&signature, &message, &derive_public_key(&phrase), true));
    }

    #[test]
    fn prop_signature_bit_flip_is_rejected(
        message in proptest::collection::vec(any::<u8>(), 1..128),
        bit in 0usize..512,
    ) {
        let pair = KeyPair::from_phrase(PHRASE);
        let signature = pair.sign(&message).unwrap();

        let mut bytes = *signature.as_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        let tampered = Signature::from_bytes(bytes);

        prop_assert!(!verify(&tampered, &message, &pair.public_key(), true));
    }

    #[test]
    fn prop_message_change_is_rejected(
        message in proptest::collection::vec(any::<u8>(), 1..128),
        index in any::<prop::sample::Index>(),
    ) {
        let pair = KeyPair::from_phrase(PHRASE);
        let signature = pair.sign(&message).unwrap();

        let mut altered = message.clone();
        let i = index.index(altered.len());
        altered[i] ^= 0x01;

        prop_assert!(!verify(&signature, &altered, &pair.public_key(), true));
    }

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        nonce in any::<[u8; 32]>(),
    ) {
        let alice = KeyPair::from_phrase("alice");
        let bob = KeyPair::from_phrase("bob");
        let channel = SecureChannel::new();

        let envelope = channel
            .encrypt(&plaintext, alice.private_key(), &bob.public_key(), &nonce)
            .unwrap();
        prop_assert_eq!(envelope.len() % 16, 0);
        prop_assert!(envelope.len() >= 32);

        let opened = channel
            .decrypt(&envelope, bob.private_key(), &alice.public_key(), &nonce)
            .unwrap();
        prop_assert_eq!(opened, plaintext);
    }
}

proptest! {
    #[test]
    fn prop_address_roundtrip(id in any::<u64>()) {
        let codec = AddressCodec::new();
        let text = codec.encode(id);
        prop_assert_eq!(codec.decode(&text).unwrap(), id);
        prop_assert_eq!(codec.decode(&text.to_lowercase()).unwrap(), id);
        prop_assert_eq!(parse_account_id(&rs_account(id)).unwrap(), id);
    }

    #[test]
    fn prop_address_moved_separator_is_checksum_mismatch(id in any::<u64>()) {
        let codec = AddressCodec::new();
        let text = codec.encode(id);

        // Same 17 symbols, first dash shifted one place right.
        let mut chars: Vec<char> = text.chars().collect();
        chars.swap(4, 5);
        let shifted: String = chars.into_iter().collect();

        prop_assert_eq!(
            codec.decode(&shifted),
            Err(CryptoError::ChecksumMismatch {
                address: shifted.clone(),
                decoded: id,
            })
        );
    }

    #[test]
    fn prop_address_reencode_is_identity(id in any::<u64>()) {
        let codec = AddressCodec::new();
        let text = codec.encode(id);
        let decoded = codec.decode(&text).unwrap();
        prop_assert_eq!(codec.encode(decoded), text);
    }

    #[test]
    fn prop_address_single_char_change_fails(
        id in any::<u64>(),
        position in 0usize..17,
        shift in 1usize..32,
    ) {
        const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
        let codec = AddressCodec::new();
        let text = codec.encode(id);

        // Display index of the position-th symbol, skipping dashes.
        let index = text
            .char_indices()
            .filter(|&(_, c)| c != '-')
            .nth(position)
            .map(|(i, _)| i)
            .unwrap();

        let mut bytes = text.into_bytes();
        let current = ALPHABET.iter().position(|&a| a == bytes[index]).unwrap();
        bytes[index] = ALPHABET[(current + shift) % 32];
        let corrupted = String::from_utf8(bytes).unwrap();

        let result = codec.decode(&corrupted);
        prop_assert!(
            matches!(result, Err(CryptoError::MalformedAddress { .. })),
            "{} decoded as {:?}",
            corrupted,
            result
        );
    }
}
