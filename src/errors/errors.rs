use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::Token, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

/// Broad classes of failure, used by the driver and by tests that only care
/// which phase rejected a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Redeclaration,
    Resolution,
    Type,
    Unsupported,
    Internal,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Creates an error positioned at the start of `token`.
    pub fn at(error_impl: ErrorImpl, token: &Token) -> Self {
        Error::new(error_impl, token.span.start.clone())
    }

    pub fn internal(message: impl Into<String>, position: Position) -> Self {
        Error::new(
            ErrorImpl::InternalError {
                message: message.into(),
            },
            position,
        )
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::UnknownType { .. } => ErrorCategory::Syntax,
            ErrorImpl::AlreadyDeclared { .. } => ErrorCategory::Redeclaration,
            ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::NotAFunction { .. } => ErrorCategory::Resolution,
            ErrorImpl::VariableNotAssigned { .. }
            | ErrorImpl::AssignmentToReadOnly { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::ProcedureInExpression { .. } => ErrorCategory::Type,
            ErrorImpl::NotImplementedError { .. } => ErrorCategory::Unsupported,
            ErrorImpl::InternalError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::VariableNotAssigned { .. } => "VariableNotAssigned",
            ErrorImpl::AssignmentToReadOnly { .. } => "AssignmentToReadOnly",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::ProcedureInExpression { .. } => "ProcedureInExpression",
            ErrorImpl::NotImplementedError { .. } => "NotImplementedError",
            ErrorImpl::InternalError { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::AlreadyDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope",
                name
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Unknown variable `{}`", variable))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Unknown function or procedure `{}`", function))
            }
            ErrorImpl::NotAFunction { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a function or procedure", name))
            }
            ErrorImpl::VariableNotAssigned { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is read before it is assigned",
                variable
            )),
            ErrorImpl::AssignmentToReadOnly { name } => {
                ErrorTip::Suggestion(format!("`{}` is read-only and cannot be assigned", name))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Invalid type: expected `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidOperands {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Invalid operands: `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::InvalidOperand { operator, operand } => ErrorTip::Suggestion(format!(
                "Invalid operand: `{}` cannot be applied to `{}`",
                operator, operand
            )),
            ErrorImpl::ProcedureInExpression { procedure } => ErrorTip::Suggestion(format!(
                "Procedure `{}` does not return a value",
                procedure
            )),
            ErrorImpl::NotImplementedError { feature } => ErrorTip::Suggestion(format!(
                "{} is not supported yet",
                feature
            )),
            ErrorImpl::InternalError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.position.file, self.position.line, self.position.column, self.internal_error
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("duplicate declaration of {name:?}")]
    AlreadyDeclared { name: String },
    #[error("unknown variable {variable:?}")]
    VariableNotDeclared { variable: String },
    #[error("unknown function {function:?}")]
    FunctionNotDeclared { function: String },
    #[error("{name:?} is not callable")]
    NotAFunction { name: String },
    #[error("variable {variable:?} used before assignment")]
    VariableNotAssigned { variable: String },
    #[error("cannot assign to read-only {name:?}")]
    AssignmentToReadOnly { name: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("invalid type: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("invalid operands for {operator:?}: {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid operand for {operator:?}: {operand}")]
    InvalidOperand { operator: String, operand: String },
    #[error("procedure {procedure:?} used as a value")]
    ProcedureInExpression { procedure: String },
    #[error("not implemented: {feature}")]
    NotImplementedError { feature: String },
    #[error("internal compiler error: {message}")]
    InternalError { message: String },
}
