//! Field-level validation and coercion of loosely typed request values.
//!
//! Messages read like "Name can't be blank"; a failed write joins them into one
//! flash-style message.

use crate::error::{AppError, ValidationFailure};
use serde_json::Value;

#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.messages.push(format!("{} {}", humanize(field), message));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// All messages joined with ", ".
    pub fn full_messages(&self) -> String {
        self.messages.join(", ")
    }

    /// Required text: present and non-blank after trimming. Numbers are taken as their
    /// decimal text so form fields like `zip` may arrive unquoted.
    pub fn text(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        let text = match value {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            None | Some(Value::Null) => String::new(),
            Some(_) => {
                self.add(field, "is invalid");
                return None;
            }
        };
        if text.is_empty() {
            self.add(field, "can't be blank");
            return None;
        }
        Some(text)
    }

    /// Optional text: blank values are an error only when supplied.
    pub fn text_if_present(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        value.and_then(|v| self.text(field, Some(v)))
    }

    /// Required integer. Accepts JSON integers and numeric strings.
    pub fn integer(&mut self, field: &str, value: Option<&Value>) -> Option<i64> {
        if is_blank(value) {
            self.add(field, "can't be blank");
            return None;
        }
        self.integer_if_present(field, value)
    }

    pub fn integer_if_present(&mut self, field: &str, value: Option<&Value>) -> Option<i64> {
        let value = value.filter(|v| !v.is_null())?;
        let (exact, approx) = match value {
            Value::Number(n) => (n.as_i64(), n.as_f64()),
            Value::String(s) => {
                let s = s.trim();
                (s.parse::<i64>().ok(), s.parse::<f64>().ok().filter(|f| f.is_finite()))
            }
            _ => (None, None),
        };
        if exact.is_some() {
            return exact;
        }
        match approx {
            None => self.add(field, "is not a number"),
            Some(f) if f.fract() != 0.0 => self.add(field, "must be an integer"),
            // 2^63 is exactly representable; anything below it and at or above -2^63 fits.
            Some(f) if (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) => {
                return Some(f as i64)
            }
            Some(f) if f > 0.0 => self.add(field, &format!("must be less than or equal to {}", i64::MAX)),
            Some(_) => self.add(field, &format!("must be greater than or equal to {}", i64::MIN)),
        }
        None
    }

    /// Required number. Accepts JSON numbers and numeric strings.
    pub fn number(&mut self, field: &str, value: Option<&Value>) -> Option<f64> {
        if is_blank(value) {
            self.add(field, "can't be blank");
            return None;
        }
        self.number_if_present(field, value)
    }

    pub fn number_if_present(&mut self, field: &str, value: Option<&Value>) -> Option<f64> {
        let value = value.filter(|v| !v.is_null())?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        };
        if parsed.is_none() {
            self.add(field, "is not a number");
        }
        parsed
    }

    /// Boolean-ish value; absent means `None` without error.
    pub fn boolean_if_present(&mut self, field: &str, value: Option<&Value>) -> Option<bool> {
        let value = value.filter(|v| !v.is_null())?;
        let parsed = cast_bool(value);
        if parsed.is_none() {
            self.add(field, "is not a boolean");
        }
        parsed
    }

    /// Ok when empty; otherwise a validation error whose message is `Error: <messages>`.
    pub fn into_result(self, redirect_to: impl Into<String>) -> Result<(), AppError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(self.into_error(redirect_to))
    }

    /// The collected messages as one validation error, flash message `Error: <messages>`.
    pub fn into_error(self, redirect_to: impl Into<String>) -> AppError {
        let message = format!("Error: {}", self.full_messages());
        self.into_error_with_message(&message, redirect_to)
    }

    /// The collected messages as one validation error shown to the visitor as `message`.
    pub fn into_error_with_message(self, message: &str, redirect_to: impl Into<String>) -> AppError {
        AppError::Validation(ValidationFailure {
            message: message.to_string(),
            errors: self.messages,
            redirect_to: redirect_to.into(),
        })
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Form-style boolean cast: `true`/`false`, "true"/"false", "1"/"0", "t"/"f", "on"/"off", "yes"/"no".
pub fn cast_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "on" | "yes" => Some(true),
            "false" | "f" | "0" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// "shelter_id" -> "Shelter", "foster_program" -> "Foster program".
fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
