//! Row sampling.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::{Params, Result, Row};

use super::Transform;

const DEFAULT_SAMPLE_SIZE: i64 = 100;
const DEFAULT_SEED: i64 = 42;

/// How rows are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SampleMethod {
    /// Seeded uniform sample without replacement.
    Random,
    /// Every `rowCount / sampleSize`-th row, up to `sampleSize` rows.
    Systematic,
    /// The first `sampleSize` rows.
    Head,
}

/// Samples the input down to `sampleSize` rows.
///
/// Parameters: `sampleSize` (default 100, clamped to the row count),
/// `method` (`random` | `systematic` | `head`, default `random`; an
/// unrecognized value behaves as `head`), `seed` (default 42, only used by
/// `random`).
pub struct Sampler;

impl Transform for Sampler {
    fn name(&self) -> &'static str {
        "sampler"
    }

    fn apply(&self, mut rows: Vec<Row>, params: &Params) -> Result<Vec<Row>> {
        let row_count = rows.len() as i64;
        let size = params
            .int_or("sampleSize", DEFAULT_SAMPLE_SIZE)
            .clamp(0, row_count) as usize;

        let method = SampleMethod::from_str(params.str_or("method", "random"))
            .unwrap_or(SampleMethod::Head);

        match method {
            SampleMethod::Random => {
                let seed = params.int_or("seed", DEFAULT_SEED) as u64;
                let mut rng = StdRng::seed_from_u64(seed);
                let picked = rand::seq::index::sample(&mut rng, rows.len(), size);
                Ok(picked.into_iter().map(|i| rows[i].clone()).collect())
            }
            SampleMethod::Systematic => {
                if size == 0 {
                    return Ok(Vec::new());
                }
                let step = (rows.len() / size).max(1);
                Ok(rows.into_iter().step_by(step).take(size).collect())
            }
            SampleMethod::Head => {
                rows.truncate(size);
                Ok(rows)
            }
        }
    }
}
