// Serde helpers for f64 values that may be NaN or infinite
//
// JSON has no literal for these, and serde_json writes them as null and then
// refuses to read null back as f64. Undefined timepoints (NaN) and
// zero-variance effects (t = ±inf) are ordinary results here, so every
// serialized statistic goes through this encoding:
//
//   finite -> number
//   NaN    -> null
//   +inf   -> "inf"
//   -inf   -> "-inf"
//
// Deserialization also accepts "nan", "+inf", "infinity" and "-infinity".
//
// Use with `#[serde(with = "crate::float_serde")]` on an f64 field,
// `float_serde::vec` on a Vec<f64> and `float_serde::nested` on a
// Vec<Vec<f64>>.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Tag(String),
    Missing(()),
}

impl From<f64> for Repr {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Repr::Missing(())
        } else if value == f64::INFINITY {
            Repr::Tag("inf".to_string())
        } else if value == f64::NEG_INFINITY {
            Repr::Tag("-inf".to_string())
        } else {
            Repr::Number(value)
        }
    }
}

impl Repr {
    fn into_f64(self) -> Result<f64, String> {
        match self {
            Repr::Number(value) => Ok(value),
            Repr::Missing(()) => Ok(f64::NAN),
            Repr::Tag(tag) => match tag.to_ascii_lowercase().as_str() {
                "nan" => Ok(f64::NAN),
                "inf" | "+inf" | "infinity" | "+infinity" => Ok(f64::INFINITY),
                "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                _ => Err(format!("expected a number, null, \"inf\" or \"-inf\", got {:?}", tag)),
            },
        }
    }
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Repr::from(*value).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Repr::deserialize(deserializer)?
        .into_f64()
        .map_err(D::Error::custom)
}

/// Same encoding for `Vec<f64>`
pub mod vec {
    use super::Repr;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&v| Repr::from(v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(Repr::into_f64)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }
}

/// Same encoding for `Vec<Vec<f64>>`
pub mod nested {
    use super::Repr;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(rows: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            rows.iter()
                .map(|row| row.iter().map(|&v| Repr::from(v)).collect::<Vec<_>>()),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<f64>>, D::Error> {
        Vec::<Vec<Repr>>::deserialize(deserializer)?
            .into_iter()
            .map(|row| row.into_iter().map(Repr::into_f64).collect::<Result<Vec<_>, _>>())
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "crate::float_serde")]
        x: f64,
        #[serde(with = "crate::float_serde::vec")]
        xs: Vec<f64>,
    }

    #[test]
    fn test_non_finite_encoding() {
        let sample = Sample {
            x: f64::NEG_INFINITY,
            xs: vec![1.5, f64::NAN, f64::INFINITY],
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"x":"-inf","xs":[1.5,null,"inf"]}"#);
    }

    #[test]
    fn test_non_finite_round_trip() {
        let sample = Sample {
            x: f64::INFINITY,
            xs: vec![f64::NAN, -2.0, f64::NEG_INFINITY],
        };
        let back: Sample = serde_json::from_str(&serde_json::to_string(&sample).unwrap()).unwrap();
        assert_eq!(back.x, f64::INFINITY);
        assert!(back.xs[0].is_nan());
        assert_eq!(back.xs[1], -2.0);
        assert_eq!(back.xs[2], f64::NEG_INFINITY);
    }

    #[test]
    fn test_accepts_alternate_tags() {
        let back: Sample =
            serde_json::from_str(r#"{"x":"Infinity","xs":["nan","-infinity",3]}"#).unwrap();
        assert_eq!(back.x, f64::INFINITY);
        assert!(back.xs[0].is_nan());
        assert_eq!(back.xs[1], f64::NEG_INFINITY);
        assert_eq!(back.xs[2], 3.0);
    }

    #[test]
    fn test_rejects_unknown_tag() {
        let result: Result<Sample, _> = serde_json::from_str(r#"{"x":"big","xs":[]}"#);
        assert!(result.is_err());
    }
}
