mod wire;


use thiserror::Error as ThisError;

///
/// MapEntryError
///
/// Invariant violations for `Value::Map` construction/normalization.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MapEntryError {
    #[error("map contains duplicate key '{key}' at positions {left_index} and {right_index}")]
    DuplicateKey {
        key: String,
        left_index: usize,
        right_index: usize,
    },
}

///
/// Value
///
/// The single generic tree shape the engine consumes and produces, on
/// both the wire side and the domain side. Maps are ordered: entry
/// order is authored order on construction and resolved-scope order on
/// engine output. Keys are unique; duplicates are rejected at every
/// construction boundary.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    /// Ordered list of values. Order is preserved end to end.
    List(Vec<Self>),
    /// Ordered string-keyed map with unique keys.
    Map(Vec<(String, Self)>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map` from owned entries, rejecting duplicate keys.
    ///
    /// Entry order is preserved; this is the canonical constructor for
    /// caller-authored domain objects and wire payloads.
    pub fn from_entries<K, V>(entries: Vec<(K, V)>) -> Result<Self, MapEntryError>
    where
        K: Into<String>,
        V: Into<Self>,
    {
        let entries: Vec<(String, Self)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::check_entries(&entries)?;
        Ok(Self::Map(entries))
    }

    /// Validate map entry invariants without changing order.
    pub fn check_entries(entries: &[(String, Self)]) -> Result<(), MapEntryError> {
        for (right_index, (key, _)) in entries.iter().enumerate() {
            if let Some(left_index) = entries[..right_index].iter().position(|(k, _)| k == key) {
                return Err(MapEntryError::DuplicateKey {
                    key: key.clone(),
                    left_index,
                    right_index,
                });
            }
        }

        Ok(())
    }

    ///
    /// TYPES
    ///

    /// Returns true if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for every non-list, non-map variant.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Short variant label used in coercion error messages.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "object",
        }
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self { Some(*b) } else { None }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(String, Self)]> {
        if let Self::Map(entries) = self {
            Some(entries.as_slice())
        } else {
            None
        }
    }

    /// Signed view of an integral value, if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integral value, if non-negative.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Look up a map entry by key. Returns `None` for non-map values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map()?
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Returns true if the value is a map containing `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stable text rendering of a scalar, used as an identity key.
    ///
    /// Collections and `Null` have no identity and return `None`.
    #[must_use]
    pub fn identity_key(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Uint(u) => Some(u.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool   => Bool,
    i8     => Int,
    i16    => Int,
    i32    => Int,
    i64    => Int,
    u8     => Uint,
    u16    => Uint,
    u32    => Uint,
    u64    => Uint,
    f32    => Float,
    f64    => Float,
    &str   => Text,
    String => Text,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
