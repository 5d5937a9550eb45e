//! A small, self-contained SHA1 and HMAC-SHA1 implementation,
//! plus constant-time comparison, secure tokens and device fingerprints.
//!
//! The hashing core (`Hash`, `HMAC`, the word codec and the compression
//! function) is `no_std`. Everything that needs allocation, an OS random
//! source, a filesystem or logging lives behind the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(
    non_snake_case,
    clippy::cast_lossless,
    clippy::eq_op,
    clippy::identity_op,
    clippy::many_single_char_names,
    clippy::unreadable_literal
)]

#[cfg(feature = "std")]
pub mod compare;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod fingerprint;
#[cfg(feature = "std")]
pub mod storage;
#[cfg(feature = "std")]
pub mod token;

#[cfg(feature = "std")]
pub use compare::{safe_compare, verify_hmac};
#[cfg(feature = "std")]
pub use config::FingerprintConfig;
#[cfg(feature = "std")]
pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use fingerprint::{get_fingerprint, Environment, Fingerprinter, Signals};
#[cfg(feature = "std")]
pub use storage::{FileStorage, MemoryStorage, Storage};
#[cfg(feature = "std")]
pub use token::{generate_secure_token, DEFAULT_TOKEN_LEN};

/// Size of a SHA1 block, in bytes.
pub const BLOCK_LEN: usize = 64;

/// Size of a SHA1 digest, in bytes.
pub const DIGEST_LEN: usize = 20;

/// Initial state vector (h0..h4).
pub const IV: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

/// Pack four bytes into a big-endian word.
#[inline(always)]
pub const fn bytes_to_u32(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    (b0 as u32) << 24 | (b1 as u32) << 16 | (b2 as u32) << 8 | (b3 as u32)
}

/// Split a word into its four big-endian bytes.
#[inline(always)]
pub const fn u32_to_bytes(x: u32) -> [u8; 4] {
    [(x >> 24) as u8, (x >> 16) as u8, (x >> 8) as u8, x as u8]
}

#[inline(always)]
fn load_be(base: &[u8], offset: usize) -> u32 {
    let addr = &base[offset..];
    bytes_to_u32(addr[0], addr[1], addr[2], addr[3])
}

#[inline(always)]
fn store_be(base: &mut [u8], offset: usize, x: u32) {
    base[offset..offset + 4].copy_from_slice(&u32_to_bytes(x));
}

/// Length of a `len`-byte message once padded: `ceil((len + 9) / 64) * 64`.
pub const fn padded_len(len: usize) -> usize {
    (len + 9 + BLOCK_LEN - 1) / BLOCK_LEN * BLOCK_LEN
}

/// Writes the final one or two blocks for a message of `len` bytes whose
/// unprocessed tail is `tail` (shorter than a block). `out` must be zeroed.
/// Returns how many bytes of `out` were produced (64 or 128).
fn pad_tail(tail: &[u8], len: u64, out: &mut [u8; 2 * BLOCK_LEN]) -> usize {
    let r = tail.len();
    out[..r].copy_from_slice(tail);
    out[r] = 0x80;
    let n = if r < BLOCK_LEN - 8 {
        BLOCK_LEN
    } else {
        2 * BLOCK_LEN
    };
    // the length is defined modulo 2^64 bits
    let bits = len.wrapping_mul(8);
    out[n - 8..n].copy_from_slice(&bits.to_be_bytes());
    n
}

/// Pad `message` to a whole number of blocks: a `0x80` byte, zeroes up to
/// 56 mod 64, then the message bit length as a big-endian `u64`.
#[cfg(feature = "std")]
pub fn pad(message: &[u8]) -> Vec<u8> {
    let full = message.len() - message.len() % BLOCK_LEN;
    let mut tail = [0u8; 2 * BLOCK_LEN];
    let n = pad_tail(&message[full..], message.len() as u64, &mut tail);
    let mut out = Vec::with_capacity(full + n);
    out.extend_from_slice(&message[..full]);
    out.extend_from_slice(&tail[..n]);
    out
}

/// Word schedule of a single block.
struct W([u32; 80]);

#[derive(Copy, Clone)]
struct State([u32; 5]);

impl W {
    fn new(input: &[u8]) -> Self {
        let mut w = [0u32; 80];
        for i in 0..16 {
            w[i] = load_be(input, i * 4);
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }
        W(w)
    }

    #[inline(always)]
    fn Ch(x: u32, y: u32, z: u32) -> u32 {
        (x & y) | (!x & z)
    }

    #[inline(always)]
    fn Parity(x: u32, y: u32, z: u32) -> u32 {
        x ^ y ^ z
    }

    #[inline(always)]
    fn Maj(x: u32, y: u32, z: u32) -> u32 {
        (x & y) | (x & z) | (y & z)
    }

    #[cfg_attr(feature = "opt_size", inline(never))]
    #[cfg_attr(not(feature = "opt_size"), inline(always))]
    fn F(&self, t: &mut [u32; 5], i: usize, f: u32, k: u32) {
        let g = t[0]
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(t[4])
            .wrapping_add(k)
            .wrapping_add(self.0[i]);
        t[4] = t[3];
        t[3] = t[2];
        t[2] = t[1].rotate_left(30);
        t[1] = t[0];
        t[0] = g;
    }

    /// Rounds `20 * s .. 20 * s + 20`.
    fn G(&self, state: &mut State, s: usize) {
        const ROUND_CONSTANTS: [u32; 4] = [0x5a827999, 0x6ed9eba1, 0x8f1bbcdc, 0xca62c1d6];
        let k = ROUND_CONSTANTS[s];
        let t = &mut state.0;
        for i in s * 20..(s + 1) * 20 {
            let f = match s {
                0 => Self::Ch(t[1], t[2], t[3]),
                2 => Self::Maj(t[1], t[2], t[3]),
                _ => Self::Parity(t[1], t[2], t[3]),
            };
            self.F(t, i, f, k);
        }
    }
}

impl State {
    fn new() -> Self {
        State(IV)
    }

    #[inline(always)]
    fn add(&mut self, x: &State) {
        for (s, &e) in self.0.iter_mut().zip(x.0.iter()) {
            *s = s.wrapping_add(e);
        }
    }

    fn store(&self, out: &mut [u8]) {
        for (i, &e) in self.0.iter().enumerate() {
            store_be(out, i * 4, e);
        }
    }

    /// Compresses every whole block of `input`, returns the leftover length.
    fn blocks(&mut self, mut input: &[u8]) -> usize {
        let mut t = *self;
        let mut inlen = input.len();
        while inlen >= BLOCK_LEN {
            let w = W::new(input);
            w.G(&mut t, 0);
            w.G(&mut t, 1);
            w.G(&mut t, 2);
            w.G(&mut t, 3);
            t.add(self);
            self.0 = t.0;
            input = &input[BLOCK_LEN..];
            inlen -= BLOCK_LEN;
        }
        inlen
    }
}

/// Run the SHA1 compression function over one block, updating `state`.
pub fn compress(state: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
    let mut s = State(*state);
    s.blocks(block);
    *state = s.0;
}

#[derive(Copy, Clone)]
pub struct Hash {
    state: State,
    w: [u8; BLOCK_LEN],
    r: usize,
    len: u64,
}

impl Hash {
    pub fn new() -> Hash {
        Hash {
            state: State::new(),
            r: 0,
            w: [0u8; BLOCK_LEN],
            len: 0,
        }
    }

    fn _update(&mut self, input: impl AsRef<[u8]>) {
        let mut input = input.as_ref();
        self.len = self.len.wrapping_add(input.len() as u64);
        if self.r > 0 {
            let tc = ::core::cmp::min(input.len(), BLOCK_LEN - self.r);
            self.w[self.r..self.r + tc].copy_from_slice(&input[..tc]);
            self.r += tc;
            input = &input[tc..];
            if self.r < BLOCK_LEN {
                return;
            }
            self.state.blocks(&self.w);
            self.r = 0;
        }
        let rb = self.state.blocks(input);
        if rb > 0 {
            self.w[..rb].copy_from_slice(&input[input.len() - rb..]);
            self.r = rb;
        }
    }

    /// Absorb content
    pub fn update(&mut self, input: impl AsRef<[u8]>) {
        self._update(input)
    }

    /// Compute SHA1(absorbed content)
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        let mut padded = [0u8; 2 * BLOCK_LEN];
        let n = pad_tail(&self.w[..self.r], self.len, &mut padded);
        self.state.blocks(&padded[..n]);
        let mut out = [0u8; DIGEST_LEN];
        self.state.store(&mut out);
        out
    }

    /// Compute SHA1(`input`)
    pub fn hash(input: &[u8]) -> [u8; DIGEST_LEN] {
        let mut h = Hash::new();
        h.update(input);
        h.finalize()
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds a key into exactly one block: hashed if longer, zero padded otherwise.
fn key_block(k: &[u8]) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    if k.len() > BLOCK_LEN {
        block[..DIGEST_LEN].copy_from_slice(&Hash::hash(k));
    } else {
        block[..k.len()].copy_from_slice(k);
    }
    block
}

#[derive(Clone)]
pub struct HMAC {
    ih: Hash,
    padded: [u8; BLOCK_LEN],
}

impl HMAC {
    /// Compute HMAC-SHA1(`input`, `k`)
    pub fn mac(input: impl AsRef<[u8]>, k: impl AsRef<[u8]>) -> [u8; DIGEST_LEN] {
        let mut hmac = HMAC::new(k);
        hmac.update(input);
        hmac.finalize()
    }

    pub fn new(k: impl AsRef<[u8]>) -> HMAC {
        let mut padded = key_block(k.as_ref());
        for p in padded.iter_mut() {
            *p ^= 0x36;
        }
        let mut ih = Hash::new();
        ih.update(&padded[..]);
        HMAC { ih, padded }
    }

    /// Absorb content
    pub fn update(&mut self, input: impl AsRef<[u8]>) {
        self.ih.update(input);
    }

    /// Compute HMAC-SHA1 over the entire input
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        // 0x36 ^ 0x6a == 0x5c
        for p in self.padded.iter_mut() {
            *p ^= 0x6a;
        }
        let mut oh = Hash::new();
        oh.update(&self.padded[..]);
        oh.update(self.ih.finalize());
        oh.finalize()
    }
}

/// Lowercase hex SHA1 of `message`.
#[cfg(feature = "std")]
pub fn digest(message: impl AsRef<[u8]>) -> String {
    hex::encode(Hash::hash(message.as_ref()))
}

/// Lowercase hex HMAC-SHA1 of `message` under `key`.
#[cfg(feature = "std")]
pub fn hmac_sha1(key: impl AsRef<[u8]>, message: impl AsRef<[u8]>) -> String {
    hex::encode(HMAC::mac(message, key))
}

/// Wrapped `Hash` type for the `Digest` trait.
#[cfg(feature = "traits010")]
pub type WrappedHash = digest010::core_api::CoreWrapper<Hash>;

#[cfg(feature = "traits010")]
mod digest_trait010 {
    use core::fmt;

    use digest010::{
        block_buffer::Eager,
        const_oid::{AssociatedOid, ObjectIdentifier},
        consts::{U20, U64},
        core_api::{
            AlgorithmName, Block, BlockSizeUser, Buffer, BufferKindUser, FixedOutputCore,
            OutputSizeUser, Reset, UpdateCore,
        },
        FixedOutput, FixedOutputReset, HashMarker, Output, Update,
    };

    use super::Hash;

    impl AssociatedOid for Hash {
        const OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
    }

    impl AlgorithmName for Hash {
        fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Sha1")
        }
    }

    impl HashMarker for Hash {}

    impl BufferKindUser for Hash {
        type BufferKind = Eager;
    }

    impl BlockSizeUser for Hash {
        type BlockSize = U64;
    }

    impl OutputSizeUser for Hash {
        type OutputSize = U20;
    }

    impl UpdateCore for Hash {
        #[inline]
        fn update_blocks(&mut self, blocks: &[Block<Self>]) {
            for block in blocks {
                self._update(block);
            }
        }
    }

    impl Update for Hash {
        #[inline]
        fn update(&mut self, data: &[u8]) {
            self._update(data);
        }
    }

    impl FixedOutputCore for Hash {
        fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
            self._update(buffer.get_data());
            self.finalize_into(out);
        }
    }

    impl FixedOutput for Hash {
        fn finalize_into(self, out: &mut Output<Self>) {
            let h = self.finalize();
            out.copy_from_slice(&h);
        }
    }

    impl Reset for Hash {
        fn reset(&mut self) {
            *self = Self::new()
        }
    }

    impl FixedOutputReset for Hash {
        fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
            self.finalize_into(out);
            self.reset();
        }
    }
}

#[cfg(feature = "traits09")]
mod digest_trait09 {
    use digest09::consts::{U20, U64};
    use digest09::{BlockInput, FixedOutputDirty, Output, Reset, Update};

    use super::Hash;

    impl BlockInput for Hash {
        type BlockSize = U64;
    }

    impl Update for Hash {
        fn update(&mut self, input: impl AsRef<[u8]>) {
            self._update(input)
        }
    }

    impl FixedOutputDirty for Hash {
        type OutputSize = U20;

        fn finalize_into_dirty(&mut self, out: &mut Output<Self>) {
            let h = self.finalize();
            out.copy_from_slice(&h);
        }
    }

    impl Reset for Hash {
        fn reset(&mut self) {
            *self = Self::new()
        }
    }
}

#[test]
fn main() {
    let h = Hash::hash(b"");
    assert_eq!(
        &h[..],
        &[218, 57, 163, 238, 94, 107, 75, 13, 50, 85, 191, 239, 149, 96, 24, 144, 175, 216, 7, 9]
    );

    let h = Hash::hash(b"abc");
    assert_eq!(
        &h[..],
        &[
            169, 153, 62, 54, 71, 6, 129, 106, 186, 62, 37, 113, 120, 80, 194, 108, 156, 208, 216,
            157
        ]
    );

    // 55, 56 and 64 bytes straddle the length field boundary
    let h = Hash::hash(&[b'X'; 55]);
    assert_eq!(
        &h[..],
        &[9, 51, 179, 157, 39, 0, 218, 97, 17, 214, 185, 158, 49, 235, 44, 70, 187, 131, 69, 149]
    );
    let h = Hash::hash(&[b'X'; 56]);
    assert_eq!(
        &h[..],
        &[
            125, 175, 201, 45, 117, 33, 46, 113, 245, 135, 120, 15, 12, 1, 102, 173, 197, 187, 159,
            171
        ]
    );
    let h = Hash::hash(&[b'X'; 64]);
    assert_eq!(
        &h[..],
        &[218, 194, 60, 19, 102, 221, 83, 182, 45, 147, 252, 196, 182, 54, 51, 230, 213, 47, 28, 76]
    );

    let h = HMAC::mac([0u8; 0], [42u8; 69]);
    assert_eq!(
        &h[..],
        &[220, 49, 75, 107, 4, 12, 56, 144, 141, 7, 254, 99, 139, 165, 247, 121, 35, 37, 217, 132]
    );

    let h = HMAC::mac([69u8; 250], [42u8; 50]);
    assert_eq!(
        &h[..],
        &[227, 229, 82, 212, 89, 36, 86, 81, 168, 126, 125, 32, 181, 28, 108, 40, 2, 213, 102, 90]
    );

    let mut s = HMAC::new([42u8; 50]);
    s.update([69u8; 150]);
    s.update([69u8; 100]);
    let h = s.finalize();
    assert_eq!(
        &h[..],
        &[227, 229, 82, 212, 89, 36, 86, 81, 168, 126, 125, 32, 181, 28, 108, 40, 2, 213, 102, 90]
    );
}
