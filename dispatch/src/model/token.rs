//! Single-line diagnostic tokens for operations
//!
//! A token identifies an operation in trace output without serializing it.
//! Building one never fails: undefined fields become empty strings.

use super::operation::Operation;
use crate::constants::model::{CHILD_TYPE, NAME};

/// Token of an operation.
///
/// Plain operations render as `<address>: <operation>; <child-type>; <name>`.
/// Composite operations render each step's token prefixed with `_`, joined
/// by single spaces in step order.
pub fn token(operation: &Operation) -> String {
    if operation.is_composite() {
        operation
            .steps()
            .iter()
            .map(|step| format!("_{}", token(step)))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        op_token(operation)
    }
}

fn op_token(operation: &Operation) -> String {
    format!(
        "{}: {}; {}; {}",
        operation.address(),
        operation.name(),
        operation.parameter_as_string(CHILD_TYPE).unwrap_or_default(),
        operation.parameter_as_string(NAME).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceAddress;

    fn logging() -> ResourceAddress {
        ResourceAddress::new([("subsystem", "logging")])
    }

    #[test]
    fn test_token_with_all_fields() {
        let op = Operation::new("read-children-names", logging())
            .with_parameter("child-type", "logger")
            .with_parameter("name", "FILE");
        assert_eq!(
            token(&op),
            "[(\"subsystem\" => \"logging\")]: read-children-names; logger; FILE"
        );
    }

    #[test]
    fn test_token_without_name_keeps_separators() {
        let op = Operation::new("read-children-names", logging()).with_parameter("child-type", "logger");
        assert_eq!(
            token(&op),
            "[(\"subsystem\" => \"logging\")]: read-children-names; logger; "
        );
    }

    #[test]
    fn test_token_degrades_on_missing_fields() {
        let op = Operation::new("read-resource", ResourceAddress::root());
        assert_eq!(token(&op), "[]: read-resource; ; ");
    }

    #[test]
    fn test_composite_token_lists_steps_in_order() {
        let composite = Operation::composite(vec![
            Operation::new("read-resource", logging()),
            Operation::new("remove", ResourceAddress::new([("subsystem", "jmx")])),
            Operation::new("add", ResourceAddress::new([("subsystem", "mail")])),
        ])
        .unwrap();

        let token = token(&composite);
        let steps: Vec<&str> = token.split(" _").collect();
        assert_eq!(steps.len(), 3);
        assert!(token.starts_with("_[(\"subsystem\" => \"logging\")]: read-resource"));
        assert!(steps[1].starts_with("[(\"subsystem\" => \"jmx\")]: remove"));
        assert!(steps[2].starts_with("[(\"subsystem\" => \"mail\")]: add"));
    }

    #[test]
    fn test_nested_composite_is_recursive() {
        let inner = Operation::composite(vec![Operation::new("remove", logging())]).unwrap();
        let outer = Operation::composite(vec![inner]).unwrap();
        assert_eq!(token(&outer), "__[(\"subsystem\" => \"logging\")]: remove; ; ");
    }
}
