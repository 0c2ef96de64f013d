//! Pure property-bag validation.
//!
//! A pre-condition gate run before every mutating query: required-field
//! checks, semantic type checks, constraint checks, and default-value
//! substitution against a list of [`PropertyDescriptor`]s. Never touches
//! store state.

use chrono::{DateTime, NaiveDate};
use serde_json::Value as JsonValue;

use crate::error::OgmError;
use crate::graph::Params;
use crate::schema::{PropertyConstraints, PropertyDescriptor, PropertyType};

/// Validates `values` against `descriptors` in descriptor order.
///
/// Returns the value bag with defaults substituted for absent optional
/// keys, or the first violation encountered. Keys not covered by any
/// descriptor pass through untouched.
pub fn validate(values: &Params, descriptors: &[PropertyDescriptor]) -> Result<Params, OgmError> {
    let mut out = values.clone();

    for descriptor in descriptors {
        let name = descriptor.name();
        let present = match values.get(name) {
            Some(JsonValue::Null) | None => false,
            Some(_) => true,
        };

        if !present {
            if descriptor.is_required() {
                return Err(OgmError::MissingRequiredProperty(name.to_string()));
            }
            if let Some(default) = descriptor.default() {
                out.insert(name.to_string(), default.clone());
            }
            continue;
        }

        let value = &values[name];
        check_value(name, descriptor, value)?;
    }

    Ok(out)
}

/// Type-only pass used for partial updates: present keys are checked,
/// absent keys are ignored (no required check, no default substitution).
pub fn validate_partial(
    values: &Params,
    descriptors: &[PropertyDescriptor],
) -> Result<(), OgmError> {
    for descriptor in descriptors {
        match values.get(descriptor.name()) {
            Some(JsonValue::Null) | None => continue,
            Some(value) => check_value(descriptor.name(), descriptor, value)?,
        }
    }
    Ok(())
}

fn check_value(
    name: &str,
    descriptor: &PropertyDescriptor,
    value: &JsonValue,
) -> Result<(), OgmError> {
    let mismatch = |expected: PropertyType| OgmError::PropertyTypeMismatch {
        name: name.to_string(),
        expected,
        actual: type_name(value).to_string(),
    };

    match descriptor.property_type() {
        PropertyType::String => {
            let s = value.as_str().ok_or_else(|| mismatch(PropertyType::String))?;
            check_length(name, descriptor.constraint_bounds(), s.chars().count())?;
        }
        PropertyType::Number => {
            let n = value.as_f64().ok_or_else(|| mismatch(PropertyType::Number))?;
            if !n.is_finite() {
                return Err(mismatch(PropertyType::Number));
            }
            check_range(name, descriptor.constraint_bounds(), n)?;
        }
        PropertyType::Boolean => {
            value.as_bool().ok_or_else(|| mismatch(PropertyType::Boolean))?;
        }
        PropertyType::Date => {
            let s = value.as_str().ok_or_else(|| mismatch(PropertyType::Date))?;
            let valid = DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok();
            if !valid {
                return Err(mismatch(PropertyType::Date));
            }
        }
        PropertyType::Timestamp => {
            let valid = value.as_i64().is_some()
                || value
                    .as_str()
                    .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if !valid {
                return Err(mismatch(PropertyType::Timestamp));
            }
        }
        PropertyType::Buffer => match value {
            JsonValue::String(_) => {}
            JsonValue::Array(items) => {
                let all_bytes = items
                    .iter()
                    .all(|v| v.as_u64().is_some_and(|b| b <= u8::MAX as u64));
                if !all_bytes {
                    return Err(mismatch(PropertyType::Buffer));
                }
            }
            _ => return Err(mismatch(PropertyType::Buffer)),
        },
        PropertyType::Identity => {
            // Identity values come from the store, never from input bags.
            return Err(OgmError::UnsupportedPropertyType(format!(
                "identity property '{name}' in a writable value bag"
            )));
        }
        PropertyType::Map => {
            let object = value.as_object().ok_or_else(|| mismatch(PropertyType::Map))?;
            if let Some(fields) = descriptor.nested_fields() {
                for (field_name, field_descriptor) in fields {
                    let path = format!("{name}.{field_name}");
                    match object.get(field_name) {
                        Some(JsonValue::Null) | None => {
                            if field_descriptor.is_required() {
                                return Err(OgmError::MissingRequiredProperty(path));
                            }
                        }
                        Some(inner) => check_value(&path, field_descriptor, inner)?,
                    }
                }
            }
        }
        PropertyType::Array => {
            let items = value.as_array().ok_or_else(|| mismatch(PropertyType::Array))?;
            check_length(name, descriptor.constraint_bounds(), items.len())?;
            if let Some(element) = descriptor.element_descriptor() {
                for (index, item) in items.iter().enumerate() {
                    check_value(&format!("{name}[{index}]"), element, item)?;
                }
            }
        }
    }

    Ok(())
}

fn check_range(
    name: &str,
    constraints: Option<&PropertyConstraints>,
    value: f64,
) -> Result<(), OgmError> {
    let Some(c) = constraints else { return Ok(()) };
    if let Some(min) = c.min {
        if value < min {
            return Err(OgmError::ConstraintViolation {
                name: name.to_string(),
                detail: format!("{value} is below minimum {min}"),
            });
        }
    }
    if let Some(max) = c.max {
        if value > max {
            return Err(OgmError::ConstraintViolation {
                name: name.to_string(),
                detail: format!("{value} is above maximum {max}"),
            });
        }
    }
    Ok(())
}

fn check_length(
    name: &str,
    constraints: Option<&PropertyConstraints>,
    length: usize,
) -> Result<(), OgmError> {
    let Some(c) = constraints else { return Ok(()) };
    if let Some(min) = c.min_length {
        if length < min {
            return Err(OgmError::ConstraintViolation {
                name: name.to_string(),
                detail: format!("length {length} is below minimum {min}"),
            });
        }
    }
    if let Some(max) = c.max_length {
        if length > max {
            return Err(OgmError::ConstraintViolation {
                name: name.to_string(),
                detail: format!("length {length} is above maximum {max}"),
            });
        }
    }
    Ok(())
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
