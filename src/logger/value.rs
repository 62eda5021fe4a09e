//! Log field values
//!
//! Numbers and booleans keep their type in JSON records; everything else is
//! written as a string.

use serde_json::Value;

/// A value that can be attached to a log record
pub trait LogValue {
    fn to_json(&self) -> Value;
}

impl<T: LogValue + ?Sized> LogValue for &T {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

impl LogValue for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! number_value {
    ($($ty:ty),*) => {
        $(
            impl LogValue for $ty {
                fn to_json(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

macro_rules! string_value {
    ($($ty:ty),*) => {
        $(
            impl LogValue for $ty {
                fn to_json(&self) -> Value {
                    Value::String(self.to_string())
                }
            }
        )*
    };
}

number_value!(u16, u32, u64, usize, i32, i64);
string_value!(
    str,
    String,
    hyper::Method,
    std::net::SocketAddr,
    std::io::Error,
    hyper::Error
);

impl LogValue for std::path::Display<'_> {
    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }
}
