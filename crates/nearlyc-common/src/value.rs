//! Compile-time numeric values.
//! 编译期数值。

use thiserror::Error;

/// Whether a [`Value`] holds an integer or a floating point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Fp,
}

/// Errors produced when converting literal text to a [`Value`].
/// 将字面量文本转换为 [`Value`] 时产生的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Value '{0}' is too large to represent")]
    TooLarge(String),

    #[error("Value '{0}' is too small to represent")]
    TooSmall(String),

    #[error("Value '{0}' is not a valid numeric literal")]
    Invalid(String),
}

/// A numeric value known at compile time.
/// 编译期已知的数值。
///
/// Any integer (signed or unsigned, up to 64 bits) or floating point value
/// can be represented. Integers are stored as a 64-bit magnitude plus a
/// sign flag.
#[derive(Debug, Clone, Copy)]
pub struct Value {
    kind: ValueKind,
    imag: u64,
    ineg: bool,
    fpval: f64,
}

impl Value {
    fn from_parts(kind: ValueKind, imag: u64, ineg: bool, fpval: f64) -> Self {
        Value {
            kind,
            imag,
            ineg,
            fpval,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Integer magnitude (meaningless for floating point values).
    pub fn magnitude(&self) -> u64 {
        self.imag
    }

    /// True if this is a negative integer.
    pub fn is_negative(&self) -> bool {
        self.ineg
    }

    pub fn fp_value(&self) -> f64 {
        self.fpval
    }

    /// The integer value reinterpreted as a two's complement `i64`.
    /// Magnitudes above `i64::MAX` wrap.
    pub fn to_i64_wrapping(&self) -> i64 {
        if self.ineg {
            self.imag.wrapping_neg() as i64
        } else {
            self.imag as i64
        }
    }

    /// Convert literal text to a value of the requested kind.
    /// 将字面量文本转换为指定类型的值。
    ///
    /// Integer text follows C conventions: a `0x`/`0X` prefix selects
    /// hexadecimal, any other leading `0` selects octal, and trailing
    /// `u`/`l` suffixes are ignored. Literal text never carries a sign;
    /// negation is an operator applied later.
    pub fn convert_str(s: &str, kind: ValueKind) -> Result<Value, ValueError> {
        match kind {
            ValueKind::Int => convert_int(s),
            ValueKind::Fp => convert_fp(s),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::from_parts(ValueKind::Int, 0, false, 0.0)
    }
}

impl From<u64> for Value {
    fn from(ival: u64) -> Self {
        Value::from_parts(ValueKind::Int, ival, false, 0.0)
    }
}

impl From<i64> for Value {
    fn from(ival: i64) -> Self {
        let ineg = ival < 0;
        let mut imag = ival as u64;
        if ineg {
            // negate using two's complement
            imag = (!imag).wrapping_add(1);
        }
        Value::from_parts(ValueKind::Int, imag, ineg, 0.0)
    }
}

impl From<f64> for Value {
    fn from(fpval: f64) -> Self {
        Value::from_parts(ValueKind::Fp, 0, false, fpval)
    }
}

fn convert_int(s: &str) -> Result<Value, ValueError> {
    let digits = s.trim_end_matches(['u', 'U', 'l', 'L']);

    let (body, radix) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };

    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(ValueError::Invalid(s.to_string()));
    }

    match u64::from_str_radix(body, radix) {
        Ok(imag) => Ok(Value::from(imag)),
        Err(_) => Err(ValueError::TooLarge(s.to_string())),
    }
}

fn convert_fp(s: &str) -> Result<Value, ValueError> {
    let text = s.trim_end_matches(['f', 'F', 'l', 'L']);
    let fpval: f64 = text
        .parse()
        .map_err(|_| ValueError::Invalid(s.to_string()))?;

    if fpval.is_infinite() {
        return Err(ValueError::TooLarge(s.to_string()));
    }

    // A zero result from nonzero digits means the value underflowed.
    let mantissa = text.split(['e', 'E']).next().unwrap_or("");
    if fpval == 0.0 && mantissa.chars().any(|c| matches!(c, '1'..='9')) {
        return Err(ValueError::TooSmall(s.to_string()));
    }

    Ok(Value::from(fpval))
}
