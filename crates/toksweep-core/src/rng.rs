//! Deterministic RNG and seed-folding helpers.
//!
//! Both the generator (mulberry32) and the seed folder (32-bit FNV-1a over
//! canonical string parts) are wire contracts of the benchmark output: the
//! same `(seed, tokenizer, line, axis, value)` tuple must reproduce the same
//! mutated text bit-for-bit on any platform and in any execution order.

use rand::RngCore;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Unit separator placed between folded parts so that `("ab", "c")` and
/// `("a", "bc")` hash differently.
const PART_SEPARATOR: u8 = 0x1f;

/// One input part for [`hash_seed`].
///
/// Numbers are coerced to a canonical string before folding: integers render
/// as lowercase hexadecimal, non-integral floats via their shortest
/// round-trip decimal form.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedPart {
    /// Verbatim string part.
    Str(String),
    /// Unsigned integer part.
    Int(u64),
    /// Floating point part.
    Float(f64),
}

impl SeedPart {
    fn canonical(&self) -> String {
        match self {
            SeedPart::Str(s) => s.clone(),
            SeedPart::Int(n) => format!("{n:x}"),
            SeedPart::Float(v) => canonical_float(*v),
        }
    }
}

fn canonical_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
        let n = v as i64;
        return if n < 0 {
            format!("-{:x}", n.unsigned_abs())
        } else {
            format!("{n:x}")
        };
    }
    format!("{v}")
}

impl From<&str> for SeedPart {
    fn from(value: &str) -> Self {
        SeedPart::Str(value.to_string())
    }
}

impl From<String> for SeedPart {
    fn from(value: String) -> Self {
        SeedPart::Str(value)
    }
}

impl From<u32> for SeedPart {
    fn from(value: u32) -> Self {
        SeedPart::Int(value as u64)
    }
}

impl From<u64> for SeedPart {
    fn from(value: u64) -> Self {
        SeedPart::Int(value)
    }
}

impl From<usize> for SeedPart {
    fn from(value: usize) -> Self {
        SeedPart::Int(value as u64)
    }
}

impl From<f64> for SeedPart {
    fn from(value: f64) -> Self {
        SeedPart::Float(value)
    }
}

/// Folds a variable number of string/number parts into one 32-bit seed with
/// a rolling FNV-1a hash. The fold is order-sensitive and pure: identical
/// parts in identical order always yield the identical seed.
pub fn hash_seed(parts: &[SeedPart]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hash ^= PART_SEPARATOR as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        for byte in part.canonical().as_bytes() {
            hash ^= *byte as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Derives an independent sub-seed by folding `parts` after the master seed.
pub fn sub_seed(master_seed: u32, parts: &[SeedPart]) -> u32 {
    let mut all = Vec::with_capacity(parts.len() + 1);
    all.push(SeedPart::Int(master_seed as u64));
    all.extend_from_slice(parts);
    hash_seed(&all)
}

/// Deterministic mulberry32 generator handle.
///
/// A master `seed: u32` must be provided by the caller; sub-seeds for
/// independent streams are derived with [`hash_seed`]/[`sub_seed`], never by
/// sharing one generator across streams. The handle also implements
/// [`rand::RngCore`] so `rand` adapters (e.g. `SliceRandom::shuffle`) can
/// drive deterministic shuffles from the same state.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Creates a generator from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / 4_294_967_296.0
    }

    /// Returns a uniformly distributed index in `[0, max)`; `0` when `max`
    /// is zero.
    pub fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_f64() * max as f64) as usize
    }

    /// Picks one element of `items`, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = self.next_index(items.len());
            items.get(idx)
        }
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.step() as u64;
        let low = self.step() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.step().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
