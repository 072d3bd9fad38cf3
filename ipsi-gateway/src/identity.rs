//! Anything that can pay: a value exposing a user id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value that identifies the paying user.
///
/// `None` (or an empty id) means the value carries no usable identity and is
/// rejected by the link builder.
pub trait Identified {
    fn identity(&self) -> Option<String>;
}

/// Minimal user handle for callers without their own user type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Identified for UserRef {
    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn identity(&self) -> Option<String> {
        (**self).identity()
    }
}

impl<T: Identified> Identified for Option<T> {
    fn identity(&self) -> Option<String> {
        self.as_ref().and_then(Identified::identity)
    }
}

impl Identified for str {
    fn identity(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl Identified for String {
    fn identity(&self) -> Option<String> {
        Some(self.clone())
    }
}

macro_rules! numeric_identity {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn identity(&self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

numeric_identity!(u32, u64, i32, i64, usize);

/// JSON user objects identify through their `id` field.
impl Identified for Value {
    fn identity(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}
