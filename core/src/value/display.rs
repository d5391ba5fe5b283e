use std::fmt;

use super::Value;
use crate::future::FutureState;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::Object(obj) => {
                let pairs: Vec<String> = obj
                    .entries()
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect();
                write!(f, "{{ {} }}", pairs.join(", "))
            }
            Value::Thenable(_) => write!(f, "[thenable]"),
            Value::Future(future) => match future.state() {
                FutureState::Pending => write!(f, "Future {{ <pending> }}"),
                FutureState::Fulfilled(value) => {
                    write!(f, "Future {{ <fulfilled>: {value} }}")
                }
                FutureState::Rejected(reason) => {
                    write!(f, "Future {{ <rejected>: {reason} }}")
                }
            },
            Value::Error(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Object(_) => f.write_str("Object"),
            Value::Thenable(_) => f.write_str("Thenable"),
            Value::Future(future) => write!(f, "Future(#{})", future.id()),
            Value::Error(err) => write!(f, "Error({err})"),
        }
    }
}
