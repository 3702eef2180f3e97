//! Power distribution on [a, b]: `F(x) = ((x - a) / (b - a))^c`.

use super::Quantile;
use crate::error::{validation::*, ProcessError, ProcessResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerDist {
    a: f64,
    b: f64,
    c: f64,
}

impl PowerDist {
    pub fn new(a: f64, b: f64, c: f64) -> ProcessResult<Self> {
        validate_finite("a", a)?;
        validate_finite("b", b)?;
        validate_positive("c", c)?;
        if b <= a {
            return Err(ProcessError::InvalidParameters {
                parameter: "b".to_string(),
                value: b,
                constraint: format!("must be greater than a = {}", a),
            });
        }
        Ok(Self { a, b, c })
    }

    /// Power distribution on [0, 1].
    pub fn standard(c: f64) -> ProcessResult<Self> {
        Self::new(0.0, 1.0, c)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.a {
            0.0
        } else if x >= self.b {
            1.0
        } else {
            ((x - self.a) / (self.b - self.a)).powf(self.c)
        }
    }
}

impl Quantile for PowerDist {
    type Output = f64;

    fn quantile(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        self.a + (self.b - self.a) * u.powf(1.0 / self.c)
    }
}
