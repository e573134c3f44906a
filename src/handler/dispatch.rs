use crate::base::shimerror::{ShimError, ShimResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{future::Future, pin::Pin};

/// Alias for the `Future` returned by [`ApiHandler::handle`].
pub type Handling<'a> = Pin<Box<dyn Future<Output = ShimResult<Value>> + Send + 'a>>;

/// JSON entry point of one extension API.
///
/// The external dispatcher resolves an extension-script call to an API and
/// hands over the platform method name with its positional arguments. The
/// returned value is exactly what the script should receive; platform-level
/// empty results (`null`, `{}`) are values, not errors. An `Err` means the
/// call never reached the adapter (unknown method, malformed arguments).
pub trait ApiHandler: Send + Sync {
    /// Platform namespace, e.g. `"cookies"`.
    fn api_name(&self) -> &'static str;

    fn handle<'a>(&'a self, method: &'a str, args: Vec<Value>) -> Handling<'a>;
}

/// Positional call arguments.
#[derive(Debug)]
pub struct Args<'a> {
    method: &'a str,
    values: Vec<Value>,
}

impl<'a> Args<'a> {
    pub fn new(method: &'a str, values: Vec<Value>) -> Self {
        Self { method, values }
    }

    /// Argument `idx`, failing if it is missing, `null` or ill-typed.
    pub fn required<T: DeserializeOwned>(&self, idx: usize) -> ShimResult<T> {
        match self.values.get(idx) {
            None | Some(Value::Null) => Err(ShimError::invalid_arguments(
                self.method,
                format!("missing argument {}", idx),
            )),
            Some(value) => self.decode(idx, value),
        }
    }

    /// Argument `idx`, or `T::default()` when missing or `null`.
    pub fn optional<T: DeserializeOwned + Default>(&self, idx: usize) -> ShimResult<T> {
        match self.values.get(idx) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => self.decode(idx, value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, idx: usize, value: &Value) -> ShimResult<T> {
        T::deserialize(value).map_err(|e| {
            ShimError::invalid_arguments(self.method, format!("argument {}: {}", idx, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_missing() {
        let args = Args::new("get", vec![]);
        let err = args.required::<i64>(0).unwrap_err();
        assert!(matches!(err, ShimError::InvalidArguments { .. }));
    }

    #[test]
    fn test_required_ill_typed() {
        let args = Args::new("get", vec![json!("seven")]);
        assert!(args.required::<i64>(0).is_err());
    }

    #[test]
    fn test_optional_defaults() {
        let args = Args::new("getAll", vec![Value::Null]);
        let v: Vec<i64> = args.optional(0).unwrap();
        assert!(v.is_empty());
        let w: Vec<i64> = args.optional(3).unwrap();
        assert!(w.is_empty());
    }
}
