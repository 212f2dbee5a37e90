use crate::value::Value;

// Floats at or beyond this magnitude cannot be represented as i128.
const I128_FLOAT_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

///
/// NumericKey
///
/// Canonical numeric identity shared by `Int`, `Uint` and `Float`.
/// Integral floats collapse onto `Integer` so `1`, `1u64` and `1.0` agree.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum NumericKey {
    Integer(i128),
    Fractional(f64),
}

impl NumericKey {
    /// Canonical numeric key for `value`, or `None` for non-numbers and NaN.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::Integer(i128::from(*i))),
            Value::Uint(u) => Some(Self::Integer(i128::from(*u))),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) if f.fract() == 0.0 && f.abs() < I128_FLOAT_LIMIT => {
                // integral and in range, so the cast is exact; -0.0 lands on 0
                Some(Self::Integer(*f as i128))
            }
            Value::Float(f) => Some(Self::Fractional(*f)),
            _ => None,
        }
    }
}

impl Value {
    /// Shallow strict equality used for group identity.
    ///
    /// - numbers compare by numeric value across widths; NaN never matches
    /// - `Null`, `Bool` and `Text` compare by value
    /// - `List` and `Map` never match anything, including themselves
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            (
                Self::Int(_) | Self::Uint(_) | Self::Float(_),
                Self::Int(_) | Self::Uint(_) | Self::Float(_),
            ) => match (NumericKey::of(self), NumericKey::of(other)) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            },
            _ => false,
        }
    }

    /// Whether this value can ever be strictly equal to another value.
    #[must_use]
    pub fn is_self_matching(&self) -> bool {
        match self {
            Self::List(_) | Self::Map(_) => false,
            Self::Float(f) => !f.is_nan(),
            _ => true,
        }
    }
}
