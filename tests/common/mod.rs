//! A small interpreter for the IL the compiler emits.
//!
//! It understands exactly the subset of instructions, runtime calls and
//! directives the code generator produces, which is enough to observe the
//! behaviour of compiled programs without a .NET runtime.

use std::{collections::HashMap, rc::Rc};

const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Real(f64),
    Str(String),
}

impl Value {
    fn default_for(il_type: &str) -> Value {
        match il_type {
            "float64" => Value::Real(0.0),
            "string" => Value::Str(String::new()),
            _ => Value::Int(0),
        }
    }

    fn as_int(&self) -> i32 {
        match self {
            Value::Int(value) => *value,
            other => panic!("expected an int32 on the stack, found {:?}", other),
        }
    }

    fn as_real(&self) -> f64 {
        match self {
            Value::Real(value) => *value,
            other => panic!("expected a float64 on the stack, found {:?}", other),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Value::Str(value) => value,
            other => panic!("expected a string on the stack, found {:?}", other),
        }
    }

    /// Renders the value the way `Console.Write` would for `il_type`.
    fn render(&self, il_type: &str) -> String {
        match (il_type, self) {
            ("bool", Value::Int(value)) => {
                if *value != 0 { "True" } else { "False" }.to_string()
            }
            ("char", Value::Int(value)) => char::from_u32(*value as u32).unwrap().to_string(),
            (_, Value::Int(value)) => value.to_string(),
            (_, Value::Real(value)) => value.to_string(),
            (_, Value::Str(value)) => value.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Method {
    params: Vec<(String, String)>,
    returns_value: bool,
    locals: Vec<(String, String)>,
    instructions: Vec<String>,
    labels: HashMap<String, usize>,
}

pub struct Machine {
    statics: HashMap<String, Value>,
    methods: HashMap<String, Rc<Method>>,
    pub output: String,
    steps: usize,
}

/// Runs the `Main` method of `il` and returns everything it wrote.
pub fn run(il: &str) -> String {
    let mut machine = Machine::load(il);
    machine.call("Main", vec![]);
    machine.output
}

fn split_typed_list(list: &str) -> Vec<(String, String)> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (il_type, name) = item.split_once(' ').unwrap();
            (il_type.to_string(), name.trim().to_string())
        })
        .collect()
}

fn between<'a>(text: &'a str, open: char, close: char) -> &'a str {
    let start = text.find(open).unwrap() + 1;
    let end = text.rfind(close).unwrap();
    &text[start..end]
}

fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => {}
        }
    }

    result
}

impl Machine {
    pub fn load(il: &str) -> Machine {
        let mut statics = HashMap::new();
        let mut methods = HashMap::new();
        let mut current: Option<(String, Method)> = None;

        for line in il.lines() {
            let trimmed = line.trim();

            if let Some((name, mut method)) = current.take() {
                if line == "  }" {
                    methods.insert(name, Rc::new(method));
                    continue;
                }

                if let Some(rest) = trimmed.strip_prefix(".locals init") {
                    method.locals.extend(split_typed_list(between(rest, '(', ')')));
                } else if let Some(label) = trimmed.strip_suffix(':') {
                    method.labels.insert(label.to_string(), method.instructions.len());
                } else if trimmed != ".entrypoint" && !trimmed.is_empty() {
                    method.instructions.push(trimmed.to_string());
                }

                current = Some((name, method));
                continue;
            }

            if let Some(field) = trimmed.strip_prefix(".field static ") {
                let (il_type, name) = field.split_once(' ').unwrap();
                statics.insert(name.to_string(), Value::default_for(il_type));
            } else if trimmed.starts_with(".method") {
                let header = &trimmed[..trimmed.find('(').unwrap()];
                let mut words = header.split_whitespace().rev();
                let name = words.next().unwrap().to_string();
                let return_type = words.next().unwrap();

                let method = Method {
                    params: split_typed_list(between(trimmed, '(', ')')),
                    returns_value: return_type != "void",
                    ..Method::default()
                };
                current = Some((name, method));
            }
        }

        Machine {
            statics,
            methods,
            output: String::new(),
            steps: 0,
        }
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Option<Value> {
        let method = self
            .methods
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no method named {}", name));

        let mut arguments: HashMap<String, Value> = method
            .params
            .iter()
            .map(|(_, name)| name.clone())
            .zip(args)
            .collect();
        let mut locals: HashMap<String, Value> = method
            .locals
            .iter()
            .map(|(il_type, name)| (name.clone(), Value::default_for(il_type)))
            .collect();
        let mut stack: Vec<Value> = vec![];
        let mut pc = 0;

        loop {
            self.steps += 1;
            assert!(self.steps < STEP_LIMIT, "program did not terminate");

            let instruction = &method.instructions[pc];
            pc += 1;

            let (opcode, operand) = instruction
                .split_once(' ')
                .map(|(opcode, operand)| (opcode, operand.trim()))
                .unwrap_or((instruction.as_str(), ""));

            match opcode {
                "ldc.i4" => stack.push(Value::Int(operand.parse().unwrap())),
                "ldc.i4.0" => stack.push(Value::Int(0)),
                "ldc.i4.1" => stack.push(Value::Int(1)),
                "ldc.r8" => stack.push(Value::Real(operand.parse().unwrap())),
                "ldstr" => stack.push(Value::Str(unescape(&operand[1..operand.len() - 1]))),
                "ldloc" => stack.push(locals[operand].clone()),
                "stloc" => {
                    locals.insert(operand.to_string(), stack.pop().unwrap());
                }
                "ldarg" => stack.push(arguments[operand].clone()),
                "starg" => {
                    arguments.insert(operand.to_string(), stack.pop().unwrap());
                }
                "ldsfld" => stack.push(self.statics[static_name(operand)].clone()),
                "stsfld" => {
                    let value = stack.pop().unwrap();
                    self.statics.insert(static_name(operand).to_string(), value);
                }
                "add" | "sub" | "mul" | "div" | "rem" => {
                    let right = stack.pop().unwrap();
                    let left = stack.pop().unwrap();
                    stack.push(arithmetic(opcode, left, right));
                }
                "and" | "or" => {
                    let right = stack.pop().unwrap().as_int();
                    let left = stack.pop().unwrap().as_int();
                    let value = if opcode == "and" { left & right } else { left | right };
                    stack.push(Value::Int(value));
                }
                "ceq" | "cgt" | "clt" => {
                    let right = stack.pop().unwrap();
                    let left = stack.pop().unwrap();
                    stack.push(Value::Int(compare(opcode, left, right) as i32));
                }
                "neg" => {
                    let value = match stack.pop().unwrap() {
                        Value::Int(value) => Value::Int(value.wrapping_neg()),
                        Value::Real(value) => Value::Real(-value),
                        other => panic!("cannot negate {:?}", other),
                    };
                    stack.push(value);
                }
                "not" => {
                    let value = stack.pop().unwrap().as_int();
                    stack.push(Value::Int(!value));
                }
                "conv.r8" => {
                    let value = stack.pop().unwrap().as_int();
                    stack.push(Value::Real(value as f64));
                }
                "conv.i4" => {
                    let value = stack.pop().unwrap().as_int();
                    stack.push(Value::Int(value));
                }
                "br" => pc = method.labels[operand],
                "brtrue" => {
                    if stack.pop().unwrap().as_int() != 0 {
                        pc = method.labels[operand];
                    }
                }
                "brfalse" => {
                    if stack.pop().unwrap().as_int() == 0 {
                        pc = method.labels[operand];
                    }
                }
                "pop" => {
                    stack.pop().unwrap();
                }
                "call" => self.call_instruction(operand, &mut stack),
                "ret" => {
                    return if method.returns_value {
                        Some(stack.pop().unwrap())
                    } else {
                        None
                    };
                }
                other => panic!("unsupported instruction {}", other),
            }
        }
    }

    fn call_instruction(&mut self, operand: &str, stack: &mut Vec<Value>) {
        let (return_type, target) = operand.split_once(' ').unwrap();
        let signature = target[..target.find('(').unwrap()].trim();
        let (qualifier, name) = signature.rsplit_once("::").unwrap();
        let param_types = between(target, '(', ')')
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .collect::<Vec<_>>();

        let split = stack.len() - param_types.len();
        let args = stack.split_off(split);

        let result = match (qualifier, name) {
            ("Program", name) => self.call(name, args),
            ("[System.Console]System.Console", "Write") => {
                let text = args[0].render(param_types[0]);
                self.output.push_str(&text);
                None
            }
            ("[System.Console]System.Console", "WriteLine") => {
                self.output.push('\n');
                None
            }
            ("[System.Runtime]System.String", "Concat") => Some(Value::Str(format!(
                "{}{}",
                args[0].as_str(),
                args[1].as_str()
            ))),
            ("[System.Runtime]System.String", "CompareOrdinal") => {
                let ordering = args[0].as_str().cmp(args[1].as_str());
                Some(Value::Int(ordering as i32))
            }
            ("[PSILib]PSILib.Helper", _) => Some(Value::Str(args[0].render(param_types[0]))),
            ("[PSILib]PSILib.Lib", "Sqrt") => Some(Value::Real(args[0].as_real().sqrt())),
            ("[PSILib]PSILib.Lib", "Round") => {
                Some(Value::Int(args[0].as_real().round() as i32))
            }
            ("[PSILib]PSILib.Lib", "Random") => Some(Value::Int(0)),
            ("[PSILib]PSILib.Lib", "get_Pi") => Some(Value::Real(std::f64::consts::PI)),
            ("[PSILib]PSILib.Lib", "Sleep") | ("[PSILib]PSILib.Lib", "Beep") => None,
            (qualifier, name) => panic!("unknown call target {}::{}", qualifier, name),
        };

        match (return_type, result) {
            ("void", None) => {}
            (_, Some(value)) => stack.push(value),
            (return_type, None) => panic!("{} call produced no value", return_type),
        }
    }
}

fn static_name(operand: &str) -> &str {
    operand.rsplit_once("::").unwrap().1
}

fn arithmetic(opcode: &str, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => Value::Int(match opcode {
            "add" => left.wrapping_add(right),
            "sub" => left.wrapping_sub(right),
            "mul" => left.wrapping_mul(right),
            "div" => left / right,
            _ => left % right,
        }),
        (Value::Real(left), Value::Real(right)) => Value::Real(match opcode {
            "add" => left + right,
            "sub" => left - right,
            "mul" => left * right,
            "div" => left / right,
            _ => left % right,
        }),
        (left, right) => panic!("mismatched operands {:?} {} {:?}", left, opcode, right),
    }
}

fn compare(opcode: &str, left: Value, right: Value) -> bool {
    let ordering = match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => l.partial_cmp(r),
        (Value::Real(l), Value::Real(r)) => l.partial_cmp(r),
        (Value::Str(l), Value::Str(r)) if opcode == "ceq" => l.partial_cmp(r),
        _ => panic!("cannot compare {:?} and {:?}", left, right),
    };

    match (opcode, ordering) {
        ("ceq", Some(ordering)) => ordering.is_eq(),
        ("cgt", Some(ordering)) => ordering.is_gt(),
        ("clt", Some(ordering)) => ordering.is_lt(),
        _ => false,
    }
}
