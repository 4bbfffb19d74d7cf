use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Ordered name/value path identifying a management resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAddress {
    segments: Vec<(String, String)>,
}

impl ResourceAddress {
    /// The root resource
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, K, V>(segments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append one segment, returning the extended address
    pub fn child(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.segments.push((name.into(), value.into()));
        self
    }

    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Model form: a list of single-entry objects
    pub fn to_model(&self) -> Value {
        Value::Array(
            self.segments
                .iter()
                .map(|(k, v)| {
                    let mut entry = Map::new();
                    entry.insert(k.clone(), Value::String(v.clone()));
                    Value::Object(entry)
                })
                .collect(),
        )
    }

    pub fn from_model(value: &Value) -> Result<Self> {
        let entries = match value {
            Value::Null => return Ok(Self::root()),
            Value::Array(entries) => entries,
            other => return Err(anyhow!("Address must be a list, got: {}", other)),
        };

        let mut segments = Vec::with_capacity(entries.len());
        for entry in entries {
            let object = entry
                .as_object()
                .filter(|o| o.len() == 1)
                .ok_or_else(|| anyhow!("Address segment must be a single property: {}", entry))?;
            for (name, value) in object {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                segments.push((name.clone(), value));
            }
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "(\"{}\" => \"{}\")", name, value)?;
        }
        write!(f, "]")
    }
}

/// Parses the command line form `subsystem=logging/logger=org.jboss`.
/// A lone `/` or an empty string is the root address.
impl FromStr for ResourceAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut address = Self::root();
        for segment in s.split('/').filter(|p| !p.is_empty()) {
            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid address segment '{}', expected name=value", segment))?;
            if name.is_empty() || value.is_empty() {
                return Err(anyhow!("Invalid address segment '{}'", segment));
            }
            address = address.child(name, value);
        }
        Ok(address)
    }
}
