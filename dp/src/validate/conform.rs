//! Structural check of a JSON value against a [`Shape`]

use serde_json::Value;

use crate::request::Shape;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `value` against `shape`, reporting the first mismatch with its path
///
/// Unknown object members are ignored. Optional fields may be missing or
/// null.
pub fn conform(shape: &Shape, value: &Value, path: &str) -> Result<(), String> {
    match shape {
        Shape::String { non_empty } => match value {
            Value::String(s) if *non_empty && s.trim().is_empty() => Err(format!("{path} must not be empty")),
            Value::String(_) => Ok(()),
            other => Err(format!("{path} must be a string, got {}", type_name(other))),
        },
        Shape::Number { minimum } => {
            let Some(n) = value.as_f64() else {
                return Err(format!("{path} must be a number, got {}", type_name(value)));
            };
            match minimum {
                Some(min) if n < *min => Err(format!("{path} must be at least {min}, got {n}")),
                _ => Ok(()),
            }
        }
        Shape::Array {
            items,
            min_items,
            max_items,
        } => {
            let Value::Array(elements) = value else {
                return Err(format!("{path} must be an array, got {}", type_name(value)));
            };
            let len = elements.len();
            if let Some(min) = min_items
                && len < *min
            {
                return Err(format!("{path} must have at least {min} entries, got {len}"));
            }
            if let Some(max) = max_items
                && len > *max
            {
                return Err(format!("{path} must have at most {max} entries, got {len}"));
            }
            elements
                .iter()
                .enumerate()
                .try_for_each(|(i, element)| conform(items, element, &format!("{path}[{i}]")))
        }
        Shape::Object { fields } => {
            let Value::Object(map) = value else {
                return Err(format!("{path} must be an object, got {}", type_name(value)));
            };
            for field in fields {
                let field_path = format!("{path}.{}", field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) if field.required => {
                        return Err(format!("{field_path} is missing"));
                    }
                    None | Some(Value::Null) => {}
                    Some(member) => conform(&field.shape, member, &field_path)?,
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Field;
    use serde_json::json;

    fn meal() -> Shape {
        Shape::object(vec![
            Field::required("dishName", Shape::non_empty_string()),
            Field::required("calories", Shape::non_negative_number()),
            Field::optional("note", Shape::string()),
        ])
    }

    #[test]
    fn test_required_field_missing() {
        let err = conform(&meal(), &json!({"dishName": "Poha"}), "$").unwrap_err();
        assert_eq!(err, "$.calories is missing");
    }

    #[test]
    fn test_optional_field_may_be_null_or_absent() {
        assert!(conform(&meal(), &json!({"dishName": "Poha", "calories": 250}), "$").is_ok());
        assert!(conform(&meal(), &json!({"dishName": "Poha", "calories": 250, "note": null}), "$").is_ok());
        assert!(conform(&meal(), &json!({"dishName": "Poha", "calories": 250, "note": 3}), "$").is_err());
    }

    #[test]
    fn test_empty_dish_name_and_negative_calories() {
        assert!(conform(&meal(), &json!({"dishName": "  ", "calories": 250}), "$").is_err());
        let err = conform(&meal(), &json!({"dishName": "Poha", "calories": -5}), "$").unwrap_err();
        assert!(err.contains("at least 0"));
    }

    #[test]
    fn test_array_bounds_and_paths() {
        let shape = Shape::array_between(meal(), 1, 2);
        assert!(conform(&shape, &json!([]), "$").is_err());

        let err = conform(
            &shape,
            &json!([{"dishName": "Poha", "calories": 1}, {"dishName": "Upma", "calories": "lots"}]),
            "$",
        )
        .unwrap_err();
        assert_eq!(err, "$[1].calories must be a number, got string");
    }

    #[test]
    fn test_unknown_members_are_ignored() {
        let value = json!({"dishName": "Idli", "calories": 150, "cuisine": "South Indian"});
        assert!(conform(&meal(), &value, "$").is_ok());
    }
}
