//! # Curve Engine
//!
//! The elliptic-curve capability the signature scheme and secure channel are
//! built on. Protocol code only ever talks to the [`CurveEngine`] trait; the
//! default [`Curve25519`] backend does the arithmetic with `curve25519-dalek`
//! and `x25519-dalek`.
//!
//! ## The x-only signing trick
//!
//! Public keys are Montgomery u-coordinates, the same 32 bytes X25519 uses.
//! A u-coordinate names two points, `(u, v)` and `(u, -v)`. The engine
//! resolves this by defining `abs(P)` as the one whose Montgomery `v` is even
//! (the HEAT ledger's convention), and by choosing the signing scalar `s` at
//! keygen time so that `s * abs(P) = B`:
//!
//! ```text
//! keygen:  A = k B,  P = u(A),  s = (±k)^-1 mod q   (sign picked so s·abs(P) = B)
//! sign:    v = (x - h) s mod q
//! verify:  Y = u(v·abs(P) + h B) = u((x - h) B + h B) = u(x B)
//! ```
//!
//! The verifier never needs the sign of `A`, and the public key stays a
//! plain DH key.
//!
//! dalek never exposes `v`, so [`field`] recovers it from `u` with a square
//! root mod p and maps it through `x = c·u/v`, where `c = sqrt(-486664)` is
//! the root that sends `(9, v_B)` to the Ed25519 base point.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigUint;

use crate::error::CryptoError;

/// Output of [`CurveEngine::keygen`].
#[derive(Clone, Copy)]
pub struct KeygenOutput {
    /// Montgomery u-coordinate of `clamp(seed) * B`.
    pub public: [u8; 32],
    /// Scalar `s` with `s * abs(public) = B`. Only meaningful to `sign`.
    pub signing_scalar: [u8; 32],
}

/// Elliptic-curve primitives consumed by the protocol layer.
///
/// Implementations must be pure. `dh` must be symmetric:
/// `dh(a.priv, b.pub) == dh(b.priv, a.pub)`.
pub trait CurveEngine {
    /// Clamp a 32-byte scalar: clear the low three bits, clear bit 255, set bit 254.
    fn clamp(&self, scalar: [u8; 32]) -> [u8; 32];

    /// Derive the public point and the signing scalar from a seed.
    /// The seed is clamped first.
    fn keygen(&self, seed: &[u8; 32]) -> KeygenOutput;

    /// X25519 scalar multiplication of `public` by `private`.
    fn dh(&self, private: &[u8; 32], public: &[u8; 32]) -> [u8; 32];

    /// `v = (x - h) * s mod q`.
    fn sign(&self, h: &[u8; 32], x: &[u8; 32], s: &[u8; 32]) -> Result<[u8; 32], CryptoError>;

    /// Recover `u(v·abs(P) + h·B)`. `None` when `public` is not on the curve.
    fn verify(&self, v: &[u8; 32], h: &[u8; 32], public: &[u8; 32]) -> Option<[u8; 32]>;

    /// Is `signature[..32]` a fully reduced scalar?
    fn is_canonical_signature(&self, signature: &[u8]) -> bool;

    /// Is `public` the unique encoding of its field element?
    fn is_canonical_public_key(&self, public: &[u8]) -> bool;
}

/// Default curve engine over Curve25519 / Ed25519.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Curve25519;

impl CurveEngine for Curve25519 {
    fn clamp(&self, mut scalar: [u8; 32]) -> [u8; 32] {
        scalar[0] &= 0xF8;
        scalar[31] &= 0x7F;
        scalar[31] |= 0x40;
        scalar
    }

    fn keygen(&self, seed: &[u8; 32]) -> KeygenOutput {
        let k = self.clamp(*seed);
        let point = EdwardsPoint::mul_base_clamped(k);

        let public = point.to_montgomery().to_bytes();

        // k·B is on the curve, so the abs sign always exists.
        let abs_sign = field::abs_edwards_sign(&public).unwrap_or(0);
        let k_scalar = Scalar::from_bytes_mod_order(k);
        let oriented = if edwards_sign(&point) == abs_sign {
            k_scalar
        } else {
            -k_scalar
        };

        KeygenOutput {
            public,
            // Zero only if q divides k. The inverse of zero is zero, and sign()
            // reports that as an engine failure.
            signing_scalar: oriented.invert().to_bytes(),
        }
    }

    fn dh(&self, private: &[u8; 32], public: &[u8; 32]) -> [u8; 32] {
        x25519_dalek::x25519(*private, *public)
    }

    fn sign(&self, h: &[u8; 32], x: &[u8; 32], s: &[u8; 32]) -> Result<[u8; 32], CryptoError> {
        let h = Scalar::from_bytes_mod_order(*h);
        let x = Scalar::from_bytes_mod_order(*x);
        let s = Scalar::from_bytes_mod_order(*s);

        let v = (x - h) * s;
        if v == Scalar::ZERO {
            return Err(CryptoError::CurveEngineFailure("signature scalar is zero"));
        }
        Ok(v.to_bytes())
    }

    fn verify(&self, v: &[u8; 32], h: &[u8; 32], public: &[u8; 32]) -> Option<[u8; 32]> {
        let abs_p = abs_point(public)?;
        let v = Scalar::from_bytes_mod_order(*v);
        let h = Scalar::from_bytes_mod_order(*h);

        let y = EdwardsPoint::vartime_double_scalar_mul_basepoint(&v, &abs_p, &h);
        Some(y.to_montgomery().to_bytes())
    }

    fn is_canonical_signature(&self, signature: &[u8]) -> bool {
        let Some(v) = signature.get(..32) else {
            return false;
        };
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(v);
        Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes)).is_some()
    }

    fn is_canonical_public_key(&self, public: &[u8]) -> bool {
        if public.len() != 32 {
            return false;
        }
        // Bit 255 is not part of the field element.
        if public[31] & 0x80 != 0 {
            return false;
        }
        // Reject p..2^255-1, i.e. 0x7fff..ffed through 0x7fff..ffff.
        let above_p = public[31] == 0x7F
            && public[1..31].iter().all(|&b| b == 0xFF)
            && public[0] >= 0xED;
        !above_p
    }
}

/// Sign bit of the compressed Edwards encoding (the parity of x).
fn edwards_sign(point: &EdwardsPoint) -> u8 {
    point.compress().as_bytes()[31] >> 7
}

/// The Edwards point over `u` whose Montgomery `v` is even.
/// `None` when `u` is not on the curve.
fn abs_point(u: &[u8; 32]) -> Option<EdwardsPoint> {
    let sign = field::abs_edwards_sign(u)?;
    MontgomeryPoint(*u).to_edwards(sign)
}

// ---------------------------------------------------------------------------
// Field arithmetic mod p = 2^255 - 19
// ---------------------------------------------------------------------------

/// Just enough of GF(p) to recover the Montgomery `v` of a public key.
mod field {
    use super::BigUint;

    /// Montgomery curve coefficient.
    const A: u32 = 486_662;

    /// `sqrt(-486664)`, fixed so that `(9, v_B)` maps to the Ed25519 base point.
    const C: [u8; 32] = [
        0xE7, 0x81, 0xBA, 0x00, 0x55, 0xFB, 0x91, 0x33, 0x7D, 0xE5, 0x82, 0xB4, 0x2E, 0x2C, 0x5E,
        0x3A, 0x81, 0xB0, 0x03, 0xFC, 0x23, 0xF7, 0x84, 0x2D, 0x44, 0xF9, 0x5F, 0x9F, 0x0B, 0x12,
        0xD9, 0x70,
    ];

    /// `2^((p-1)/4)`, a square root of -1.
    const SQRT_M1: [u8; 32] = [
        0xB0, 0xA0, 0x0E, 0x4A, 0x27, 0x1B, 0xEE, 0xC4, 0x78, 0xE4, 0x2F, 0xAD, 0x06, 0x18, 0x43,
        0x2F, 0xA7, 0xD7, 0xFB, 0x3D, 0x99, 0x00, 0x4D, 0x2B, 0x0B, 0xDF, 0xC1, 0x4F, 0x80, 0x24,
        0x83, 0x2B,
    ];

    fn modulus() -> BigUint {
        (BigUint::from(1u8) << 255u32) - BigUint::from(19u8)
    }

    /// `u` as a reduced field element. Bit 255 is ignored, as in X25519.
    fn element(bytes: &[u8; 32]) -> BigUint {
        let mut masked = *bytes;
        masked[31] &= 0x7F;
        BigUint::from_bytes_le(&masked) % modulus()
    }

    fn invert(x: &BigUint, p: &BigUint) -> BigUint {
        x.modpow(&(p - BigUint::from(2u8)), p)
    }

    /// A square root of `w`, or `None` if `w` is not a square. p ≡ 5 mod 8.
    fn sqrt(w: &BigUint, p: &BigUint) -> Option<BigUint> {
        let exponent = (p + BigUint::from(3u8)) >> 3u32;
        let candidate = w.modpow(&exponent, p);
        if (&candidate * &candidate) % p == *w {
            return Some(candidate);
        }
        let candidate = (candidate * BigUint::from_bytes_le(&SQRT_M1)) % p;
        if (&candidate * &candidate) % p == *w {
            return Some(candidate);
        }
        None
    }

    /// The even Montgomery `v` over `u`, from `v^2 = u^3 + A u^2 + u`.
    pub(super) fn even_v(u: &[u8; 32]) -> Option<BigUint> {
        let p = modulus();
        let u = element(u);
        let w = (&u * &u * &u + BigUint::from(A) * &u * &u + &u) % &p;
        let root = sqrt(&w, &p)?;
        if root.bit(0) {
            Some(&p - root)
        } else {
            Some(root)
        }
    }

    /// Edwards sign bit of the point over `u` with even Montgomery `v`.
    pub(super) fn abs_edwards_sign(u_bytes: &[u8; 32]) -> Option<u8> {
        let p = modulus();
        let v = even_v(u_bytes)?;
        let u = element(u_bytes);
        // v = 0 only for the order-2 point, where x = 0 too.
        let x = (BigUint::from_bytes_le(&C) * u * invert(&v, &p)) % &p;
        Some(u8::from(x.bit(0)))
    }

}
