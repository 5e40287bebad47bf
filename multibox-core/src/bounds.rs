use crate::error::NumberBoxError;

/// Lower/upper bound pair plus the overflow policy.
///
/// Construction guarantees `minimum <= maximum` and no NaN bound, so
/// [`Range::validate`] never sees a degenerate range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    minimum: f64,
    maximum: f64,
    wrap: bool,
}

impl Default for Range {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Range {
    pub fn new(minimum: f64, maximum: f64, wrap: bool) -> Result<Self, NumberBoxError> {
        check_bounds(minimum, maximum)?;
        Ok(Self {
            minimum,
            maximum,
            wrap,
        })
    }

    /// The full f64 range, clamping. This is what a fresh box uses.
    pub fn unbounded() -> Self {
        Self {
            minimum: f64::MIN,
            maximum: f64::MAX,
            wrap: false,
        }
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Rejects a minimum above the current maximum; the range is left untouched.
    pub fn set_minimum(&mut self, minimum: f64) -> Result<(), NumberBoxError> {
        check_bounds(minimum, self.maximum)?;
        self.minimum = minimum;
        Ok(())
    }

    /// Rejects a maximum below the current minimum; the range is left untouched.
    pub fn set_maximum(&mut self, maximum: f64) -> Result<(), NumberBoxError> {
        check_bounds(self.minimum, maximum)?;
        self.maximum = maximum;
        Ok(())
    }

    /// Bring a stepped value back inside the range.
    ///
    /// Wrapping jumps to the opposite bound once; it is not modular, so an
    /// overshoot larger than the whole range still lands exactly on a bound.
    pub fn validate(&self, value: f64) -> f64 {
        if self.wrap {
            if value > self.maximum {
                self.minimum
            } else if value < self.minimum {
                self.maximum
            } else {
                value
            }
        } else {
            value.clamp(self.minimum, self.maximum)
        }
    }
}

fn check_bounds(minimum: f64, maximum: f64) -> Result<(), NumberBoxError> {
    if minimum.is_nan() || maximum.is_nan() {
        return Err(NumberBoxError::NanBound);
    }
    if minimum > maximum {
        tracing::warn!(minimum, maximum, "rejected inverted range");
        return Err(NumberBoxError::InvertedRange { minimum, maximum });
    }
    Ok(())
}
