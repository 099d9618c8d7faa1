//! The seam between templates and the objects they script.

use crate::error::{ScriptError, ScriptResult};
use crate::value::Value;

/// Objects and functions a template can reach.
///
/// Templates never see ambient globals: every identifier that is not a local
/// variable is looked up through [`ScriptHost::global`], and every property
/// or method of a host object goes through the host. Calls are synchronous
/// and may mutate the host.
pub trait ScriptHost {
    /// Resolve a global identifier such as `story` or `character`.
    fn global(&self, name: &str) -> Option<Value>;

    /// Read a property of a host object.
    fn get(&self, object: &str, property: &str) -> ScriptResult<Value>;

    /// Write a property of a host object.
    fn set(&mut self, object: &str, property: &str, value: Value) -> ScriptResult<()> {
        let _ = value;
        Err(ScriptError::NoProperty {
            target: object.to_string(),
            property: property.to_string(),
        })
    }

    /// Call a method of a host object.
    fn call(&mut self, object: &str, method: &str, args: Vec<Value>) -> ScriptResult<Value>;

    /// Call a free function that is not a built-in.
    fn call_function(&mut self, name: &str, args: Vec<Value>) -> ScriptResult<Value> {
        let _ = args;
        Err(ScriptError::Undefined(name.to_string()))
    }
}

/// A host exposing nothing. Templates rendered against it can only use
/// literals, locals, and built-in functions.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHost;

impl ScriptHost for EmptyHost {
    fn global(&self, _name: &str) -> Option<Value> {
        None
    }

    fn get(&self, object: &str, property: &str) -> ScriptResult<Value> {
        Err(ScriptError::NoProperty {
            target: object.to_string(),
            property: property.to_string(),
        })
    }

    fn call(&mut self, object: &str, method: &str, _args: Vec<Value>) -> ScriptResult<Value> {
        Err(ScriptError::NoMethod {
            target: object.to_string(),
            method: method.to_string(),
        })
    }
}

/// Check a call's argument count.
pub fn expect_args(name: &str, args: &[Value], expected: usize) -> ScriptResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ScriptError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        })
    }
}

/// Extract a string argument.
pub fn str_arg<'v>(name: &str, args: &'v [Value], index: usize) -> ScriptResult<&'v str> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(ScriptError::Type(format!(
            "argument {} of {name} must be a string, got {}",
            index + 1,
            other.type_name()
        ))),
        None => Err(ScriptError::Arity {
            name: name.to_string(),
            expected: index + 1,
            got: args.len(),
        }),
    }
}

/// Extract a numeric argument.
pub fn number_arg(name: &str, args: &[Value], index: usize) -> ScriptResult<f64> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(ScriptError::Type(format!(
            "argument {} of {name} must be a number, got {}",
            index + 1,
            other.type_name()
        ))),
        None => Err(ScriptError::Arity {
            name: name.to_string(),
            expected: index + 1,
            got: args.len(),
        }),
    }
}
