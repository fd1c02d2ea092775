//! Shared helpers for the integration tests.

#![allow(dead_code)]

use packwire::{Ext, Timestamp, Value};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

pub fn map(fields: &[(&str, Value)]) -> Value {
    Value::Map(
        fields
            .iter()
            .map(|(k, v)| (Value::from(*k), v.clone()))
            .collect(),
    )
}

pub fn ts(seconds: i64, nanoseconds: u32) -> Value {
    Value::Timestamp(Timestamp::new(seconds, nanoseconds).expect("valid timestamp"))
}

/// Deterministic random value trees.
pub struct ValueGen {
    rng: Xoshiro256StarStar,
}

impl ValueGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    pub fn value(&mut self, depth: usize) -> Value {
        let kinds = if depth == 0 { 10 } else { 12 };
        match self.rng.gen_range(0..kinds) {
            0 => Value::Nil,
            1 => Value::Bool(self.rng.gen()),
            2 => Value::Int(self.int()),
            3 => Value::UInt(self.rng.gen()),
            4 => Value::F32(f32::from_bits(self.rng.gen())),
            5 => Value::F64(self.rng.gen::<f64>() * 1e12 - 5e11),
            6 => Value::Str(self.string()),
            7 => Value::Bin(self.bytes()),
            8 => Value::Ext(Ext::new(self.rng.gen_range(0..=127), self.bytes())),
            9 => ts(self.rng.gen(), self.rng.gen_range(0..1_000_000_000)),
            10 => {
                let len = self.container_len();
                Value::Array((0..len).map(|_| self.value(depth - 1)).collect())
            }
            _ => {
                let len = self.container_len();
                Value::Map(
                    (0..len)
                        .map(|_| (Value::Str(self.string()), self.value(depth - 1)))
                        .collect(),
                )
            }
        }
    }

    // Biased towards format class boundaries.
    fn int(&mut self) -> i64 {
        const EDGES: [i64; 12] = [
            0, 127, 128, 255, 256, 65_535, 65_536, -1, -32, -33, -128, -129,
        ];
        if self.rng.gen_bool(0.5) {
            EDGES[self.rng.gen_range(0..EDGES.len())]
        } else {
            self.rng.gen()
        }
    }

    fn container_len(&mut self) -> usize {
        if self.rng.gen_bool(0.1) {
            self.rng.gen_range(16..40)
        } else {
            self.rng.gen_range(0..16)
        }
    }

    fn string(&mut self) -> String {
        let len = self.rng.gen_range(0..48);
        (0..len)
            .map(|_| match self.rng.gen_range(0..4) {
                0 => 'é',
                1 => '😀',
                _ => self.rng.gen_range(b'a'..=b'z') as char,
            })
            .collect()
    }

    fn bytes(&mut self) -> Vec<u8> {
        let len = self.rng.gen_range(0..300);
        (0..len).map(|_| self.rng.gen()).collect()
    }
}

/// The user records shape used by the size comparison and the benchmark.
pub fn user_records(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                map(&[
                    ("id", Value::from(i as u64)),
                    ("name", Value::from(format!("user_{i}"))),
                    ("email", Value::from(format!("user_{i}@example.com"))),
                    ("active", Value::Bool(i % 2 == 0)),
                    ("score", Value::F64(i as f64 * 1.5)),
                    ("tags", Value::Array(vec!["alpha".into(), "beta".into()])),
                ])
            })
            .collect(),
    )
}
