//! Reduction methods.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use ia_core::Real;

use crate::AggError;

/// Reduces the values of one group, in input order, to a single value.
/// Never called with an empty slice.
pub type Reducer = Arc<dyn Fn(&[Real]) -> Real + Send + Sync>;

/// How the members of an aggregation group are combined.
#[derive(Clone, Default)]
pub enum Method {
    #[default]
    Sum,
    Max,
    Custom { name: String, reduce: Reducer },
}

impl Method {
    pub fn custom(
        name: impl Into<String>,
        reduce: impl Fn(&[Real]) -> Real + Send + Sync + 'static,
    ) -> Self {
        Method::Custom {
            name: name.into(),
            reduce: Arc::new(reduce),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Method::Sum => "sum",
            Method::Max => "max",
            Method::Custom { name, .. } => name,
        }
    }

    pub fn is_sum(&self) -> bool {
        matches!(self, Method::Sum)
    }

    pub fn reduce(&self, values: &[Real]) -> Real {
        match self {
            Method::Sum => values.iter().sum(),
            Method::Max => values.iter().copied().fold(Real::NEG_INFINITY, Real::max),
            Method::Custom { reduce, .. } => reduce(values),
        }
    }
}

impl FromStr for Method {
    type Err = AggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Method::Sum),
            "max" => Ok(Method::Max),
            other => Err(AggError::InvalidMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Custom { name, .. } => write!(f, "Custom({name})"),
            _ => f.write_str(self.name()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_resolve_up_front() {
        assert!("sum".parse::<Method>().unwrap().is_sum());
        assert_eq!("max".parse::<Method>().unwrap().name(), "max");
        let err = "foo".parse::<Method>().unwrap_err();
        assert_eq!(err, AggError::InvalidMethod { method: "foo".into() });
    }

    #[test]
    fn builtin_reductions() {
        let values = [6.0, 2.0, 1.0];
        assert_eq!(Method::Sum.reduce(&values), 9.0);
        assert_eq!(Method::Max.reduce(&values), 6.0);
        assert_eq!(Method::Max.reduce(&[-3.0, -1.0]), -1.0);
    }

    #[test]
    fn custom_reducer_sees_input_order() {
        let first = Method::custom("first", |v| v[0]);
        assert_eq!(first.reduce(&[3.0, 1.0]), 3.0);
        assert_eq!(format!("{first:?}"), "Custom(first)");
        assert!(!first.is_sum());
    }
}
