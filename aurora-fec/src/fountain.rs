//! Rateless Luby-Transform-style fountain code over byte blocks (§4.1).
//!
//! A symbol carries only its 32-bit seed; both encoder and decoder expand
//! that seed into the same degree and source-block index set, so nothing but
//! the seed (plus the XORed payload) needs to cross the wire. Decoding runs
//! Gauss-Jordan elimination over GF(2), `O(K^2 * T)` worst case, same
//! complexity bound the teacher's RaptorQ wrapper accepts for its own
//! session-based decode.

use aurora_core::prng::Xorshift64;

/// One fountain-coded symbol. `degree` is redundant with what `seed` expands
/// to — it rides along for telemetry/debugging, never trusted by the decoder
/// over its own re-expansion of `seed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub seed: u32,
    pub degree: u32,
    pub data: Vec<u8>,
}

/// Expand a symbol seed into `(degree, sorted distinct source-block indices)`
/// for a source block count of `k`. Both [`Encoder::emit`] and
/// [`Decoder::add_symbol`] call this so they always agree.
pub fn expand_seed(seed: u32, k: usize) -> (usize, Vec<usize>) {
    assert!(k > 0, "source block count must be positive");
    let mut rng = Xorshift64::new(seed as u64 ^ 0xA5A5_A5A5_A5A5_A5A5);
    let degree = sample_degree(rng.next_f64(), k);
    let mut indices = Vec::with_capacity(degree);
    // Sample `degree` distinct indices in [0, k) by rejection.
    while indices.len() < degree {
        let candidate = rng.next_below(k as u32) as usize;
        if !indices.contains(&candidate) {
            indices.push(candidate);
        }
    }
    indices.sort_unstable();
    (degree, indices)
}

/// Inverse-CDF sample of `P(d = k) = 1/(k(k+1))`, clamped to `[1, k_max]`
/// (§4.1). The telescoping sum `Σ_{i=1}^{n} 1/(i(i+1)) = n/(n+1)` gives a
/// closed-form inverse: the smallest `n` with `n/(n+1) >= u` is
/// `n = ceil(u / (1 - u))`.
fn sample_degree(u: f64, k_max: usize) -> usize {
    if k_max == 0 {
        return 0;
    }
    if u >= 1.0 {
        return k_max;
    }
    let raw = (u / (1.0 - u)).ceil();
    let n = if raw.is_finite() && raw >= 1.0 {
        raw as usize
    } else {
        1
    };
    n.clamp(1, k_max)
}

/// Splits `payload` into `K = ceil(len / block_size)` equal blocks,
/// zero-padding the last, and emits rateless symbols over them.
pub struct Encoder {
    blocks: Vec<Vec<u8>>,
    block_size: usize,
    rng: Xorshift64,
}

impl Encoder {
    /// `block_size` is `T` from §4.1 (typically 128 or 256 bytes).
    /// `seed` seeds the outer symbol-seed stream (§5 determinism knob).
    pub fn new(payload: &[u8], block_size: usize, seed: u64) -> Self {
        assert!(block_size > 0, "block size must be positive");
        let k = payload.len().div_ceil(block_size).max(1);
        let mut blocks = Vec::with_capacity(k);
        for i in 0..k {
            let start = i * block_size;
            let end = (start + block_size).min(payload.len());
            let mut block = vec![0u8; block_size];
            if start < payload.len() {
                block[..end - start].copy_from_slice(&payload[start..end]);
            }
            blocks.push(block);
        }
        Self {
            blocks,
            block_size,
            rng: Xorshift64::new(seed),
        }
    }

    /// Number of source blocks `K`.
    pub fn k(&self) -> usize {
        self.blocks.len()
    }

    /// Emit one fountain symbol.
    pub fn emit(&mut self) -> Symbol {
        let seed = self.rng.next_u32();
        let (degree, indices) = expand_seed(seed, self.blocks.len());
        let mut data = vec![0u8; self.block_size];
        for idx in &indices {
            xor_into(&mut data, &self.blocks[*idx]);
        }
        Symbol {
            seed,
            degree: degree as u32,
            data,
        }
    }

    /// Emit `n` symbols.
    pub fn emit_n(&mut self, n: usize) -> Vec<Symbol> {
        (0..n).map(|_| self.emit()).collect()
    }
}

fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}

/// A GF(2) row: a bitset over `K` source-block columns.
#[derive(Debug, Clone)]
struct BitRow {
    words: Vec<u64>,
}

impl BitRow {
    fn zeros(k: usize) -> Self {
        Self {
            words: vec![0u64; k.div_ceil(64).max(1)],
        }
    }

    fn from_indices(k: usize, indices: &[usize]) -> Self {
        let mut row = Self::zeros(k);
        for &idx in indices {
            row.set(idx);
        }
        row
    }

    fn set(&mut self, col: usize) {
        self.words[col / 64] |= 1u64 << (col % 64);
    }

    fn get(&self, col: usize) -> bool {
        (self.words[col / 64] >> (col % 64)) & 1 == 1
    }

    fn xor_assign(&mut self, other: &BitRow) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a ^= b;
        }
    }

    fn first_set_from(&self, start_col: usize, k: usize) -> Option<usize> {
        (start_col..k).find(|&c| self.get(c))
    }
}

struct Row {
    bits: BitRow,
    data: Vec<u8>,
}

/// Accumulates fountain symbols for one source block and attempts to solve
/// them via Gauss-Jordan elimination over GF(2).
pub struct Decoder {
    k: usize,
    block_size: usize,
    rows: Vec<Row>,
    seen_seeds: std::collections::HashSet<u32>,
}

/// Outcome of a [`Decoder::solve`] attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// Full rank reached; payload recovered.
    Recovered(Vec<u8>),
    /// Insufficient independent symbols so far.
    Insufficient,
}

impl Decoder {
    pub fn new(k: usize, block_size: usize) -> Self {
        Self {
            k: k.max(1),
            block_size,
            rows: Vec::new(),
            seen_seeds: std::collections::HashSet::new(),
        }
    }

    /// Number of source blocks this decoder targets.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of symbols accumulated so far (including seed duplicates, which
    /// are still counted as "seen" for telemetry but contribute no new row).
    pub fn symbols_seen(&self) -> usize {
        self.rows.len()
    }

    /// Feed one symbol into the accumulator. Duplicate seeds are dropped —
    /// they would add a zero-information row (and in the exceedingly rare
    /// genuine-seed-collision case, an all-zero one) to the system.
    pub fn add_symbol(&mut self, symbol: &Symbol) {
        if !self.seen_seeds.insert(symbol.seed) {
            return;
        }
        let (_, indices) = expand_seed(symbol.seed, self.k);
        self.rows.push(Row {
            bits: BitRow::from_indices(self.k, &indices),
            data: symbol.data.clone(),
        });
    }

    /// Attempt to solve. May be called after every new symbol (§4.1: "decoding
    /// MAY be attempted greedily each step").
    pub fn solve(&mut self) -> DecodeResult {
        if self.rows.len() < self.k {
            return DecodeResult::Insufficient;
        }
        let k = self.k;
        // Work on a scratch copy so a failed attempt doesn't destroy state —
        // more symbols may arrive next step.
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .map(|r| Row {
                bits: r.bits.clone(),
                data: r.data.clone(),
            })
            .collect();

        let mut pivot_row_for_col: Vec<Option<usize>> = vec![None; k];
        let mut next_free_row = 0usize;

        for col in 0..k {
            // Tie-break: scan downward from the current row for a pivot.
            let pivot = (next_free_row..rows.len()).find(|&r| rows[r].bits.get(col));
            let Some(pivot_idx) = pivot else { continue };
            rows.swap(next_free_row, pivot_idx);
            let pivot_idx = next_free_row;
            next_free_row += 1;
            pivot_row_for_col[col] = Some(pivot_idx);

            // Eliminate this column from every other row (full Gauss-Jordan,
            // not just below-pivot), so a successful solve needs no separate
            // back-substitution pass.
            let (before, after) = rows.split_at_mut(pivot_idx);
            let (pivot_row, after) = after.split_first_mut().expect("pivot_idx in range");
            for row in before.iter_mut().chain(after.iter_mut()) {
                if row.bits.get(col) {
                    row.bits.xor_assign(&pivot_row.bits);
                    xor_into(&mut row.data, &pivot_row.data);
                }
            }
        }

        let rank = pivot_row_for_col.iter().filter(|p| p.is_some()).count();
        if rank < k {
            return DecodeResult::Insufficient;
        }

        let mut payload = Vec::with_capacity(k * self.block_size);
        for col in 0..k {
            let row_idx = pivot_row_for_col[col].expect("full rank implies every column pivots");
            debug_assert!(
                rows[row_idx].bits.first_set_from(0, k) == Some(col),
                "pivot row must be reduced to its own column"
            );
            payload.extend_from_slice(&rows[row_idx].data);
        }
        DecodeResult::Recovered(payload)
    }
}
