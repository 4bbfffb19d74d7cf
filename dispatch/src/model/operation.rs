use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::address::ResourceAddress;
use crate::constants::model::{ADDRESS, COMPOSITE, OP, STEPS};

/// One management command: an address, an operation name, optional
/// composite steps and named parameters.
///
/// A composite operation is always named `composite` and carries at least one
/// step; any other operation carries none. Only [`Operation::composite`] can
/// attach steps, so an operation merely named `composite` through
/// [`Operation::new`] is not composite and is refused when routed.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    address: ResourceAddress,
    name: String,
    steps: Vec<Operation>,
    parameters: BTreeMap<String, Value>,
}

impl Operation {
    pub fn new(name: impl Into<String>, address: ResourceAddress) -> Self {
        Self {
            address,
            name: name.into(),
            steps: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    /// Build a composite operation executed by the server as one unit
    pub fn composite(steps: Vec<Operation>) -> Result<Self> {
        if steps.is_empty() {
            return Err(anyhow!("Composite operation requires at least one step"));
        }
        Ok(Self {
            address: ResourceAddress::root(),
            name: COMPOSITE.to_string(),
            steps,
            parameters: BTreeMap::new(),
        })
    }

    /// Set a named parameter. Structural names (`operation`, `address`,
    /// `steps`) are not parameters and are ignored.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !is_structural(&name) {
            self.parameters.insert(name, value.into());
        }
        self
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_composite(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Operation] {
        &self.steps
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// True if the parameter was explicitly set, even to `false` or `""`
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// String form of a defined parameter. Strings are returned unquoted;
    /// other values use their JSON text. `null` counts as undefined.
    pub fn parameter_as_string(&self, name: &str) -> Option<String> {
        match self.parameters.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Model value handed to the wire codec
    pub fn to_model(&self) -> Value {
        let mut object = Map::new();
        object.insert(OP.to_string(), Value::String(self.name.clone()));
        object.insert(ADDRESS.to_string(), self.address.to_model());
        if self.is_composite() {
            object.insert(
                STEPS.to_string(),
                Value::Array(self.steps.iter().map(Operation::to_model).collect()),
            );
        }
        for (name, value) in &self.parameters {
            object.insert(name.clone(), value.clone());
        }
        Value::Object(object)
    }

    pub fn from_model(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("Operation must be an object, got: {}", value))?;

        let name = object
            .get(OP)
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Operation is missing '{}'", OP))?;

        let address = ResourceAddress::from_model(object.get(ADDRESS).unwrap_or(&Value::Null))?;

        let mut operation = if name == COMPOSITE {
            let steps = object
                .get(STEPS)
                .and_then(|v| v.as_array())
                .ok_or_else(|| anyhow!("Composite operation is missing '{}'", STEPS))?
                .iter()
                .map(Operation::from_model)
                .collect::<Result<Vec<_>>>()?;
            let mut composite = Self::composite(steps)?;
            composite.address = address;
            composite
        } else {
            Self::new(name, address)
        };

        for (key, value) in object {
            if !is_structural(key) {
                operation.parameters.insert(key.clone(), value.clone());
            }
        }
        Ok(operation)
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent + 4);
        writeln!(f, "{{")?;
        write!(f, "{}\"{}\" => \"{}\",\n{}\"{}\" => {}", pad, OP, self.name, pad, ADDRESS, self.address)?;
        if self.is_composite() {
            write!(f, ",\n{}\"{}\" => [", pad, STEPS)?;
            for (i, step) in self.steps.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "\n{}    ", pad)?;
                step.write_text(f, indent + 8)?;
            }
            write!(f, "\n{}]", pad)?;
        }
        for (name, value) in &self.parameters {
            write!(f, ",\n{}\"{}\" => ", pad, name)?;
            write_value(f, value)?;
        }
        write!(f, "\n{}}}", " ".repeat(indent))
    }
}

fn is_structural(name: &str) -> bool {
    matches!(name, OP | ADDRESS | STEPS)
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "undefined"),
        Value::Array(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_value(f, item)?;
            }
            write!(f, "]")
        }
        Value::Object(entries) => {
            write!(f, "{{")?;
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "\"{}\" => ", k)?;
                write_value(f, v)?;
            }
            write!(f, "}}")
        }
        other => write!(f, "{}", other),
    }
}

/// DMR text form, used in failure messages and redirect logs
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f, 0)
    }
}
