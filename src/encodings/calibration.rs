use nalgebra::DMatrix;

use crate::errors::CodecError;

/// One polynomial term `coefficient · x^exponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub exponent: u32,
}

impl Term {
    pub fn new(coefficient: f64, exponent: u32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }
}

/// Maps raw wire integers to calibrated engineering values and back
/// through `y = Σ cᵢ · xⁱ`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCalibrator {
    pub terms: Vec<Term>,
}

impl PolynomialCalibrator {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// `y = intercept + slope · x`.
    pub fn linear(intercept: f64, slope: f64) -> Self {
        Self::new(vec![Term::new(intercept, 0), Term::new(slope, 1)])
    }

    /// Raw to calibrated, evaluated in f64.
    pub fn calibrate(&self, raw: i64) -> Result<f64, CodecError> {
        let x = raw as f64;
        let y: f64 = self
            .terms
            .iter()
            .map(|t| t.coefficient * x.powi(t.exponent as i32))
            .sum();
        if !y.is_finite() {
            return Err(CodecError::NonFiniteCalibration);
        }
        Ok(y)
    }

    /// Calibrated back to raw. The linear case is solved analytically;
    /// higher degrees take the roots of `p(x) − y` from the companion
    /// matrix and keep the real part of the *last* eigenvalue. Which root
    /// comes last is an artifact of the eigenvalue routine, but it is the
    /// inherited observable behavior, so it stays.
    pub fn uncalibrate(&self, calibrated: f64) -> Result<i64, CodecError> {
        let x = if self.terms.len() == 2 {
            (calibrated - self.terms[0].coefficient) / self.terms[1].coefficient
        } else {
            self.last_root(calibrated)?
        };
        if !x.is_finite() {
            return Err(CodecError::NonFiniteCalibration);
        }
        // Rounding first absorbs float representation noise; the cast
        // then truncates toward zero.
        Ok(round_places(x, 12) as i64)
    }

    fn last_root(&self, calibrated: f64) -> Result<f64, CodecError> {
        // Coefficients indexed by exponent, constant term shifted by -y.
        let degree = self.terms.iter().map(|t| t.exponent).max().unwrap_or(0) as usize;
        let mut ascending = vec![0.0; degree + 1];
        for term in &self.terms {
            ascending[term.exponent as usize] += term.coefficient;
        }
        ascending[0] -= calibrated;

        while ascending.len() > 1 && ascending[ascending.len() - 1] == 0.0 {
            ascending.pop();
        }
        match ascending.len() {
            0 | 1 => return Err(CodecError::NonFiniteCalibration),
            2 => return Ok(-ascending[0] / ascending[1]),
            _ => {}
        }

        // Companion matrix of the monic polynomial, highest degree first.
        let highest = ascending[ascending.len() - 1];
        let descending: Vec<f64> = ascending.iter().rev().map(|c| c / highest).collect();
        let n = descending.len() - 1;
        let companion = DMatrix::from_fn(n, n, |row, col| {
            if row == 0 {
                -descending[col + 1]
            } else if row == col + 1 {
                1.0
            } else {
                0.0
            }
        });
        let eigenvalues = companion.complex_eigenvalues();
        Ok(eigenvalues[eigenvalues.len() - 1].re)
    }
}

/// Wrapper matching XTCE's `DefaultCalibrator` extension point; only the
/// polynomial calibrator is implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum Calibrator {
    Polynomial(PolynomialCalibrator),
}

impl Calibrator {
    pub fn calibrate(&self, raw: i64) -> Result<f64, CodecError> {
        match self {
            Calibrator::Polynomial(p) => p.calibrate(raw),
        }
    }

    pub fn uncalibrate(&self, calibrated: f64) -> Result<i64, CodecError> {
        match self {
            Calibrator::Polynomial(p) => p.uncalibrate(calibrated),
        }
    }
}

/// Round to a fixed number of decimal places, neutralizing representation
/// noise after calibrated decodes.
pub(crate) fn round_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_slope() {
        let cal = PolynomialCalibrator::linear(0.0, 1.0);
        assert_eq!(cal.calibrate(12).unwrap(), 12.0);
        assert_eq!(cal.uncalibrate(12.0).unwrap(), 12);
    }

    #[test]
    fn intercept_shift() {
        let cal = PolynomialCalibrator::linear(10.0, 1.0);
        assert_eq!(cal.calibrate(12).unwrap(), 22.0);
        assert_eq!(cal.uncalibrate(22.0).unwrap(), 12);
    }

    #[test]
    fn fractional_slope() {
        let cal = PolynomialCalibrator::linear(10.0, 0.1);
        assert_eq!(cal.calibrate(12).unwrap(), 11.2);
        assert_eq!(cal.uncalibrate(11.2).unwrap(), 12);
    }

    #[test]
    fn quadratic_roots() {
        let cal = PolynomialCalibrator::new(vec![
            Term::new(-15.0, 0),
            Term::new(2.0, 1),
            Term::new(1.0, 2),
        ]);
        assert_eq!(cal.calibrate(12).unwrap(), 153.0);
        // x² + 2x − 168 has roots 12 and −14; which one the eigenvalue
        // routine lists last is backend-defined.
        let raw = cal.uncalibrate(153.0).unwrap();
        assert!(raw == 12 || raw == -14, "got {raw}");
        assert_eq!(cal.calibrate(raw).unwrap(), 153.0);
    }

    #[test]
    fn ccsds_quartic_forward() {
        let cal = PolynomialCalibrator::new(vec![
            Term::new(-7459.23273708, 0),
            Term::new(8.23643519148, 1),
            Term::new(-3.02185061876e3, 2),
            Term::new(2.33422429056e-7, 3),
            Term::new(5.67189556173e11, 4),
        ]);
        assert_eq!(cal.calibrate(8012).unwrap(), 2.3371790673058884e+27);
    }

    #[test]
    fn rounding_neutralizes_noise() {
        assert_eq!(round_places(12.000000000000002, 12), 12.0);
        assert_eq!(round_places(122.10000000000001, 12), 122.1);
    }
}
