//! Built-in implementations of the core XPath 1.0 functions layout queries use.

use super::engine::{EvaluationContext, XPathValue};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-set
        "position" => func_position(args, e_ctx),
        "last" => func_last(args, e_ctx),
        "count" => func_count(args),
        "local-name" => func_local_name(args, e_ctx),
        "name" => func_name(args, e_ctx),

        // String
        "string" => func_string(args, e_ctx),
        "concat" => func_concat(args),
        "contains" => func_contains(args),
        "starts-with" => func_starts_with(args),
        "normalize-space" => func_normalize_space(args, e_ctx),

        // Boolean
        "not" => func_not(args),
        "true" => func_true(args),
        "false" => func_false(args),

        _ => Err(XPathError::UnknownFunction(name.to_string())),
    }
}

fn expect_arity<N>(
    function: &str,
    args: &[XPathValue<N>],
    range: std::ops::RangeInclusive<usize>,
) -> Result<(), XPathError> {
    if range.contains(&args.len()) {
        Ok(())
    } else {
        Err(XPathError::FunctionError {
            function: function.to_string(),
            message: format!(
                "expected {} to {} arguments, got {}",
                range.start(),
                range.end(),
                args.len()
            ),
        })
    }
}

/// The node-set argument, or the context node when the argument is omitted.
fn node_arg<'a, N: DataSourceNode<'a>>(
    function: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Option<N>, XPathError> {
    expect_arity(function, &args, 0..=1)?;
    match args.into_iter().next() {
        None => Ok(Some(e_ctx.context_node)),
        Some(value) => Ok(value.into_nodes()?.into_iter().next()),
    }
}

fn func_position<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("position", &args, 0..=0)?;
    Ok(XPathValue::Number(e_ctx.context_position as f64))
}

fn func_last<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("last", &args, 0..=0)?;
    Ok(XPathValue::Number(e_ctx.context_size as f64))
}

fn func_count<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("count", &args, 1..=1)?;
    let nodes = args.into_iter().next().map(XPathValue::into_nodes).transpose()?;
    Ok(XPathValue::Number(nodes.map_or(0, |n| n.len()) as f64))
}

fn func_local_name<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    let node = node_arg("local-name", args, e_ctx)?;
    let name = node
        .and_then(|n| n.name())
        .map(|q| q.local_part.to_string())
        .unwrap_or_default();
    Ok(XPathValue::String(name))
}

fn func_name<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    let node = node_arg("name", args, e_ctx)?;
    let name = node
        .and_then(|n| n.name())
        .map(|q| match q.prefix {
            Some(prefix) => format!("{}:{}", prefix, q.local_part),
            None => q.local_part.to_string(),
        })
        .unwrap_or_default();
    Ok(XPathValue::String(name))
}

fn func_string<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("string", &args, 0..=1)?;
    let s = match args.into_iter().next() {
        Some(value) => value.to_string(),
        None => e_ctx.context_node.string_value(),
    };
    Ok(XPathValue::String(s))
}

fn func_concat<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("concat", &args, 2..=usize::MAX)?;
    Ok(XPathValue::String(
        args.iter().map(|a| a.to_string()).collect(),
    ))
}

fn two_strings<'a, N: DataSourceNode<'a>>(
    function: &str,
    args: Vec<XPathValue<N>>,
) -> Result<(String, String), XPathError> {
    expect_arity(function, &args, 2..=2)?;
    let mut it = args.into_iter().map(|a| a.to_string());
    match (it.next(), it.next()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(XPathError::FunctionError {
            function: function.to_string(),
            message: "missing argument".to_string(),
        }),
    }
}

fn func_contains<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    let (haystack, needle) = two_strings("contains", args)?;
    Ok(XPathValue::Boolean(haystack.contains(&needle)))
}

fn func_starts_with<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    let (s, prefix) = two_strings("starts-with", args)?;
    Ok(XPathValue::Boolean(s.starts_with(&prefix)))
}

fn func_normalize_space<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("normalize-space", &args, 0..=1)?;
    let s = match args.into_iter().next() {
        Some(value) => value.to_string(),
        None => e_ctx.context_node.string_value(),
    };
    Ok(XPathValue::String(
        s.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}

fn func_not<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("not", &args, 1..=1)?;
    Ok(XPathValue::Boolean(!args.iter().any(|a| a.to_bool())))
}

fn func_true<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("true", &args, 0..=0)?;
    Ok(XPathValue::Boolean(true))
}

fn func_false<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    expect_arity("false", &args, 0..=0)?;
    Ok(XPathValue::Boolean(false))
}
