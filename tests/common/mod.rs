#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

pub struct SequenceGenerator {
    rng: StdRng,
}

impl SequenceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn random_dna(&mut self, length: usize) -> String {
        const BASES: [char; 4] = ['a', 'c', 'g', 't'];
        (0..length)
            .map(|_| BASES[self.rng.gen_range(0..4)])
            .collect()
    }

    /// Copy `seq` with substitutions, single-base insertions and deletions
    /// at the given rate.
    pub fn mutate(&mut self, seq: &str, rate: f64) -> String {
        let mut out = String::with_capacity(seq.len());
        for c in seq.chars() {
            if self.rng.gen::<f64>() >= rate {
                out.push(c);
                continue;
            }
            match self.rng.gen_range(0..3) {
                0 => out.push(if c == 'a' { 'c' } else { 'a' }),
                1 => {
                    out.push(c);
                    out.push(['a', 'c', 'g', 't'][self.rng.gen_range(0..4)]);
                }
                _ => {}
            }
        }
        out
    }

    pub fn range(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..high)
    }
}

pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match c {
            'a' => 't',
            't' => 'a',
            'c' => 'g',
            'g' => 'c',
            other => other,
        })
        .collect()
}

/// Write each read into its own file under `dir`, uppercased as sequencers do.
pub fn write_reads(dir: &Path, reads: &[(&str, &str)]) {
    for (name, seq) in reads {
        fs::write(dir.join(name), format!("{}\n", seq.to_uppercase())).unwrap();
    }
}
