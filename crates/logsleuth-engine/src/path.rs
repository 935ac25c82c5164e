//! Typed accessors over a parsed segment document.
//!
//! Every accessor distinguishes three outcomes: a value was found, the path
//! matched nothing (benign absence, `Ok(None)` / empty vec), or something is
//! actually wrong (malformed path expression, node of the wrong type). The
//! caller never has to interpret a zero value as "missing".

use serde_json::Value;

use crate::error::{Error, Result};

fn select<'a>(doc: &'a Value, path: &str) -> Result<Vec<&'a Value>> {
    jsonpath_lib::select(doc, path).map_err(|err| Error::Path {
        path: path.to_string(),
        message: format!("{:?}", err),
    })
}

/// First match by document order as a string, or `None` when the path
/// yields no matches. A non-string first match is a hard error.
pub fn one_string(doc: &Value, path: &str) -> Result<Option<String>> {
    match select(doc, path)?.first() {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::Type {
            path: path.to_string(),
            expected: "string",
        }),
        None => Ok(None),
    }
}

/// First match by document order as a number, or `None` when the path
/// yields no matches. A non-numeric first match is a hard error.
pub fn one_number(doc: &Value, path: &str) -> Result<Option<f64>> {
    match select(doc, path)?.first() {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => Ok(Some(v)),
            None => Err(Error::Type {
                path: path.to_string(),
                expected: "number",
            }),
        },
        Some(_) => Err(Error::Type {
            path: path.to_string(),
            expected: "number",
        }),
        None => Ok(None),
    }
}

/// First matching node, untyped. Used to select an enclosing object so
/// sibling fields can be read relative to it.
pub fn one_node<'a>(doc: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    Ok(select(doc, path)?.first().copied())
}

/// Every string match, in document order. Any non-string match is a hard
/// error.
pub fn all_strings(doc: &Value, path: &str) -> Result<Vec<String>> {
    let nodes = select(doc, path)?;
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Value::String(s) => out.push(s.clone()),
            _ => {
                return Err(Error::Type {
                    path: path.to_string(),
                    expected: "string",
                })
            }
        }
    }
    Ok(out)
}
