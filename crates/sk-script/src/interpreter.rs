//! Tree-walking evaluation of compiled templates.

use std::collections::HashMap;

use crate::ast::{AssignOp, BinaryOp, Expr, Stmt, Template, UnaryOp};
use crate::error::{ScriptError, ScriptResult};
use crate::host::{ScriptHost, number_arg};
use crate::value::Value;

/// Runs one template against a host, collecting its output.
pub struct Interpreter<'h> {
    host: &'h mut dyn ScriptHost,
    locals: HashMap<String, Value>,
    output: String,
}

impl<'h> Interpreter<'h> {
    /// Create an interpreter with no local variables.
    pub fn new(host: &'h mut dyn ScriptHost) -> Self {
        Self {
            host,
            locals: HashMap::new(),
            output: String::new(),
        }
    }

    /// Execute a template and return the processed text.
    pub fn run(mut self, template: &Template) -> ScriptResult<String> {
        self.exec_block(&template.body)?;
        Ok(self.output)
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> ScriptResult<()> {
        for stmt in stmts {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> ScriptResult<()> {
        match stmt {
            Stmt::Text(text) => self.output.push_str(text),
            Stmt::Emit { expr, escape } => {
                let value = self.eval(expr)?.to_string();
                if *escape {
                    self.output.push_str(&escape_html(&value));
                } else {
                    self.output.push_str(&value);
                }
            }
            Stmt::Let { name, value } => {
                let value = self.eval(value)?;
                self.locals.insert(name.clone(), value);
            }
            Stmt::Assign { target, op, value } => {
                let rhs = self.eval(value)?;
                let value = match op {
                    AssignOp::Set => rhs,
                    AssignOp::Add => add(self.eval(target)?, rhs)?,
                    AssignOp::Sub => arithmetic(BinaryOp::Sub, &self.eval(target)?, &rhs)?,
                };
                self.assign(target, value)?;
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.exec_block(then)?;
                } else {
                    self.exec_block(otherwise)?;
                }
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(())
    }

    fn eval(&mut self, expr: &Expr) -> ScriptResult<Value> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => self.lookup(name),
            Expr::Member { object, property } => {
                let object = self.eval(object)?;
                self.property(&object, property)
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::Unary { op, expr } => {
                let value = self.eval(expr)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => Ok(Value::Number(-to_number(&value)?)),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                match op {
                    BinaryOp::And if !lhs.is_truthy() => Ok(lhs),
                    BinaryOp::Or if lhs.is_truthy() => Ok(lhs),
                    BinaryOp::And | BinaryOp::Or => self.eval(rhs),
                    _ => {
                        let rhs = self.eval(rhs)?;
                        binary(*op, lhs, rhs)
                    }
                }
            }
        }
    }

    fn lookup(&self, name: &str) -> ScriptResult<Value> {
        if let Some(value) = self.locals.get(name) {
            return Ok(value.clone());
        }
        self.host
            .global(name)
            .ok_or_else(|| ScriptError::Undefined(name.to_string()))
    }

    fn property(&self, object: &Value, property: &str) -> ScriptResult<Value> {
        let missing = || ScriptError::NoProperty {
            target: object.describe(),
            property: property.to_string(),
        };
        match object {
            Value::Object(name) => self.host.get(name, property),
            Value::Item(item) => match property {
                "tag" => Ok(item.tag.as_str().into()),
                "name" => Ok(item.name.as_str().into()),
                "theme" => Ok(item.theme.as_str().into()),
                "value" => Ok(item.value.into()),
                _ => Err(missing()),
            },
            Value::Stat(stat) => match property {
                "name" => Ok(stat.name.as_str().into()),
                "initial" => Ok(stat.initial.into()),
                "theme" => Ok(stat.theme.clone().map(Value::Str).into()),
                _ => Err(missing()),
            },
            Value::Str(s) if property == "length" => Ok(s.chars().count().into()),
            _ => Err(missing()),
        }
    }

    fn assign(&mut self, target: &Expr, value: Value) -> ScriptResult<()> {
        match target {
            Expr::Ident(name) => {
                if let Some(slot) = self.locals.get_mut(name) {
                    *slot = value;
                    Ok(())
                } else if self.host.global(name).is_some() {
                    Err(ScriptError::Type(format!("cannot assign to {name}")))
                } else {
                    Err(ScriptError::Undefined(name.clone()))
                }
            }
            Expr::Member { object, property } => match self.eval(object)? {
                Value::Object(name) => self.host.set(&name, property, value),
                other => Err(ScriptError::NoProperty {
                    target: other.describe(),
                    property: property.clone(),
                }),
            },
            _ => Err(ScriptError::Type("invalid assignment target".to_string())),
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr]) -> ScriptResult<Value> {
        match callee {
            Expr::Member { object, property } => {
                let receiver = self.eval(object)?;
                let args = self.eval_args(args)?;
                match receiver {
                    Value::Object(name) => self.host.call(&name, property, args),
                    other => Err(ScriptError::NoMethod {
                        target: other.describe(),
                        method: property.clone(),
                    }),
                }
            }
            Expr::Ident(name) if !self.locals.contains_key(name) => {
                let args = self.eval_args(args)?;
                match builtin(name, &args) {
                    Some(result) => result,
                    None => self.host.call_function(name, args),
                }
            }
            other => {
                let value = self.eval(other)?;
                Err(ScriptError::NotCallable(value.describe()))
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> ScriptResult<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }
}

/// Pure functions available to every template.
fn builtin(name: &str, args: &[Value]) -> Option<ScriptResult<Value>> {
    let unary = |f: fn(f64) -> f64| -> ScriptResult<Value> {
        crate::host::expect_args(name, args, 1)?;
        Ok(Value::Number(f(number_arg(name, args, 0)?)))
    };
    let fold = |init: f64, f: fn(f64, f64) -> f64| -> ScriptResult<Value> {
        let mut acc = init;
        for index in 0..args.len() {
            acc = f(acc, number_arg(name, args, index)?);
        }
        Ok(Value::Number(acc))
    };

    let result = match name {
        "floor" => unary(f64::floor),
        "ceil" => unary(f64::ceil),
        "round" => unary(f64::round),
        "abs" => unary(f64::abs),
        "min" => fold(f64::INFINITY, f64::min),
        "max" => fold(f64::NEG_INFINITY, f64::max),
        _ => return None,
    };
    Some(result)
}

fn to_number(value: &Value) -> ScriptResult<f64> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        other => Err(ScriptError::Type(format!(
            "expected a number, got {}",
            other.type_name()
        ))),
    }
}

fn add(lhs: Value, rhs: Value) -> ScriptResult<Value> {
    match (&lhs, &rhs) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{lhs}{rhs}"))),
        _ => Ok(Value::Number(to_number(&lhs)? + to_number(&rhs)?)),
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> ScriptResult<Value> {
    let (a, b) = (to_number(lhs)?, to_number(rhs)?);
    let n = match op {
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => unreachable!("not an arithmetic operator: {op:?}"),
    };
    Ok(Value::Number(n))
}

fn compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> ScriptResult<Value> {
    let ordering = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => to_number(lhs)?.partial_cmp(&to_number(rhs)?),
    };
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => unreachable!("not a comparison operator: {op:?}"),
    };
    Ok(Value::Bool(result))
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> ScriptResult<Value> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => arithmetic(op, &lhs, &rhs),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => compare(op, &lhs, &rhs),
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEq => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::And | BinaryOp::Or => Ok(rhs),
    }
}

/// Escape the characters HTML treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use sk_core::Item;

    use super::*;
    use crate::compile;
    use crate::host::str_arg;

    /// A host with one object, `game`, holding a counter and a log.
    #[derive(Default)]
    struct TestHost {
        counter: f64,
        log: Vec<String>,
    }

    impl ScriptHost for TestHost {
        fn global(&self, name: &str) -> Option<Value> {
            match name {
                "game" => Some(Value::Object("game".into())),
                "sword" => Some(Value::Item(Rc::new(
                    Item::new("sword").with_name("Sword").with_value(7),
                ))),
                _ => None,
            }
        }

        fn get(&self, object: &str, property: &str) -> ScriptResult<Value> {
            match (object, property) {
                ("game", "counter") => Ok(Value::Number(self.counter)),
                ("game", "title") => Ok("Tom & Jerry".into()),
                _ => Err(ScriptError::NoProperty {
                    target: object.into(),
                    property: property.into(),
                }),
            }
        }

        fn set(&mut self, object: &str, property: &str, value: Value) -> ScriptResult<()> {
            match (object, property, value) {
                ("game", "counter", Value::Number(n)) => {
                    self.counter = n;
                    Ok(())
                }
                _ => Err(ScriptError::Type(format!("cannot set {object}.{property}"))),
            }
        }

        fn call(&mut self, object: &str, method: &str, args: Vec<Value>) -> ScriptResult<Value> {
            match (object, method) {
                ("game", "log") => {
                    let line = str_arg("log", &args, 0)?;
                    self.log.push(line.to_string());
                    Ok(Value::Null)
                }
                ("game", "fail") => Err(ScriptError::Host("failed on purpose".into())),
                _ => Err(ScriptError::NoMethod {
                    target: object.into(),
                    method: method.into(),
                }),
            }
        }

        fn call_function(&mut self, name: &str, _args: Vec<Value>) -> ScriptResult<Value> {
            match name {
                "random" => Ok(Value::Number(4.0)),
                _ => Err(ScriptError::Undefined(name.into())),
            }
        }
    }

    fn run(source: &str, host: &mut TestHost) -> ScriptResult<String> {
        compile(source)?.render(host)
    }

    fn out(source: &str) -> String {
        run(source, &mut TestHost::default()).unwrap()
    }

    #[test]
    fn interpolation_and_arithmetic() {
        assert_eq!(out("<%= 1 + 2 * 3 %>"), "7");
        assert_eq!(out("<%= (1 + 2) * 3 %>"), "9");
        assert_eq!(out("<%= 7 / 2 %>"), "3.5");
        assert_eq!(out("<%= 7 % 4 %>"), "3");
        assert_eq!(out("<%= -3 + 1 %>"), "-2");
        assert_eq!(out("<%= 1e3 + 2.5E-1 %>"), "1000.25");
        assert_eq!(out("<%= -1e300 %>"), "-1e+300");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(out("<%= 'a' + 1 %>"), "a1");
        assert_eq!(out("<%= 2 + \"b\" %>"), "2b");
        assert_eq!(out("<%= 'len ' + 'four'.length %>"), "len 4");
    }

    #[test]
    fn null_interpolates_as_empty() {
        assert_eq!(out("[<%= null %>]"), "[]");
    }

    #[test]
    fn escaped_interpolation() {
        assert_eq!(out("<%- game.title %>"), "Tom &amp; Jerry");
        assert_eq!(out("<%= game.title %>"), "Tom & Jerry");
        assert_eq!(escape_html("<a href=\"x\">'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&lt;/a&gt;");
    }

    #[test]
    fn locals_and_compound_assignment() {
        assert_eq!(out("<% let x = 5; x += 2; x -= 1 %><%= x %>"), "6");
        assert_eq!(out("<% let s = 'a' %><% s += 'b' %><%= s %>"), "ab");
    }

    #[test]
    fn conditionals_span_tags() {
        let source = "<% let hp = 0 %><% if hp <= 0 { %>dead<% } else { %>alive<% } %>";
        assert_eq!(out(source), "dead");

        let chained = "<% let n = 2 %><% if n == 1 { %>one<% } else if n == 2 { %>two<% } else { %>many<% } %>";
        assert_eq!(out(chained), "two");
    }

    #[test]
    fn logical_operators_short_circuit() {
        let mut host = TestHost::default();
        run("<% false && game.log('nope') %><% true || game.log('nope') %>", &mut host).unwrap();
        assert!(host.log.is_empty());
        assert_eq!(out("<%= null || 'fallback' %>"), "fallback");
        assert_eq!(out("<%= !0 %>"), "true");
    }

    #[test]
    fn comparisons() {
        assert_eq!(out("<%= 1 < 2 %>"), "true");
        assert_eq!(out("<%= 'a' < 'b' %>"), "true");
        assert_eq!(out("<%= 2 >= 3 %>"), "false");
        assert_eq!(out("<%= 1 == 1 %> <%= 'x' != 'x' %>"), "true false");
    }

    #[test]
    fn builtins() {
        assert_eq!(out("<%= max(1, 5, 3) %>"), "5");
        assert_eq!(out("<%= min(4, 2) %>"), "2");
        assert_eq!(out("<%= floor(2.7) %> <%= ceil(2.1) %> <%= round(2.5) %> <%= abs(-3) %>"), "2 3 3 3");
    }

    #[test]
    fn builtin_arity_is_checked() {
        let err = run("<%= floor(1, 2) %>", &mut TestHost::default()).unwrap_err();
        assert!(matches!(err, ScriptError::Arity { expected: 1, got: 2, .. }));
    }

    #[test]
    fn host_functions_and_methods() {
        let mut host = TestHost::default();
        let text = run("<% game.log('hi') %>roll <%= random() %>", &mut host).unwrap();
        assert_eq!(text, "roll 4");
        assert_eq!(host.log, vec!["hi".to_string()]);
    }

    #[test]
    fn host_property_assignment() {
        let mut host = TestHost::default();
        run("<% game.counter = 3; game.counter += 2 %>", &mut host).unwrap();
        assert_eq!(host.counter, 5.0);
    }

    #[test]
    fn item_properties() {
        assert_eq!(out("<%= sword.name %> (<%= sword.tag %>) <%= sword.value %>"), "Sword (sword) 7");
        assert_eq!(out("<%= sword %>"), "Sword");
    }

    #[test]
    fn undefined_identifier_fails() {
        let err = run("<%= nothing %>", &mut TestHost::default()).unwrap_err();
        assert_eq!(err.to_string(), "nothing is not defined");
    }

    #[test]
    fn assigning_to_a_global_fails() {
        let err = run("<% game = 1 %>", &mut TestHost::default()).unwrap_err();
        assert!(matches!(err, ScriptError::Type(_)));
    }

    #[test]
    fn host_errors_propagate() {
        let err = run("before<% game.fail() %>after", &mut TestHost::default()).unwrap_err();
        assert_eq!(err.to_string(), "failed on purpose");
    }

    #[test]
    fn calling_a_non_function_fails() {
        let err = run("<% let f = 1 %><%= f() %>", &mut TestHost::default()).unwrap_err();
        assert!(matches!(err, ScriptError::NotCallable(_)));
    }

    #[test]
    fn unknown_method_on_plain_value_fails() {
        let err = run("<%= 'x'.shout() %>", &mut TestHost::default()).unwrap_err();
        assert!(matches!(err, ScriptError::NoMethod { .. }));
    }
}
