//! Binary operator semantics: equality comparisons, boolean connectives and node-set union.

use crate::ast::BinaryOperator;
use crate::datasource::DataSourceNode;
use crate::engine::XPathValue;
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        BinaryOperator::Equals => Ok(XPathValue::Boolean(compare(&left, &right, true))),
        BinaryOperator::NotEquals => Ok(XPathValue::Boolean(compare(&left, &right, false))),
        BinaryOperator::Union => union(left, right),
    }
}

fn union<'a, N: DataSourceNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    let mut nodes = left.into_nodes()?;
    nodes.extend(right.into_nodes()?);
    nodes.sort();
    nodes.dedup();
    Ok(XPathValue::NodeSet(nodes))
}

/// XPath 1.0 `=` / `!=`. A node-set compares existentially: the comparison holds
/// if it holds for at least one member.
fn compare<'a, N: DataSourceNode<'a>>(
    left: &XPathValue<N>,
    right: &XPathValue<N>,
    equal: bool,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let right_values: Vec<String> = r.iter().map(|n| n.string_value()).collect();
            l.iter().any(|ln| {
                let lv = ln.string_value();
                right_values.iter().any(|rv| (lv == *rv) == equal)
            })
        }
        (XPathValue::NodeSet(nodes), other) | (other, XPathValue::NodeSet(nodes)) => {
            match other {
                XPathValue::Boolean(b) => (!nodes.is_empty() == *b) == equal,
                XPathValue::Number(n) => nodes.iter().any(|node| {
                    let value: f64 = node.string_value().trim().parse().unwrap_or(f64::NAN);
                    (value == *n) == equal
                }),
                _ => {
                    let s = other.to_string();
                    nodes.iter().any(|node| (node.string_value() == s) == equal)
                }
            }
        }
        (XPathValue::Boolean(_), _) | (_, XPathValue::Boolean(_)) => {
            (left.to_bool() == right.to_bool()) == equal
        }
        (XPathValue::Number(_), _) | (_, XPathValue::Number(_)) => {
            (left.to_number() == right.to_number()) == equal
        }
        _ => (left.to_string() == right.to_string()) == equal,
    }
}
