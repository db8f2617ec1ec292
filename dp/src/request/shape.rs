//! Output shape descriptors
//!
//! A [`Shape`] states which fields a response must carry and how they nest.
//! The same descriptor is rendered as a JSON Schema for the provider and
//! walked by the response validator, so the two can never disagree.

use serde_json::{Map, Value, json};

/// Expected structure of a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String { non_empty: bool },
    Number { minimum: Option<f64> },
    Array {
        items: Box<Shape>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object { fields: Vec<Field> },
}

/// A named member of an object shape
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

impl Shape {
    pub fn string() -> Self {
        Shape::String { non_empty: false }
    }

    pub fn non_empty_string() -> Self {
        Shape::String { non_empty: true }
    }

    pub fn number() -> Self {
        Shape::Number { minimum: None }
    }

    pub fn non_negative_number() -> Self {
        Shape::Number { minimum: Some(0.0) }
    }

    pub fn array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    pub fn array_between(items: Shape, min: usize, max: usize) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: Some(min),
            max_items: Some(max),
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Shape::Object { fields }
    }

    /// Render as a JSON Schema document
    pub fn to_json_schema(&self) -> Value {
        match self {
            Shape::String { non_empty } => {
                if *non_empty {
                    json!({"type": "string", "minLength": 1})
                } else {
                    json!({"type": "string"})
                }
            }
            Shape::Number { minimum } => match minimum {
                Some(min) => json!({"type": "number", "minimum": min}),
                None => json!({"type": "number"}),
            },
            Shape::Array {
                items,
                min_items,
                max_items,
            } => {
                let mut schema = Map::new();
                schema.insert("type".to_string(), json!("array"));
                schema.insert("items".to_string(), items.to_json_schema());
                if let Some(min) = min_items {
                    schema.insert("minItems".to_string(), json!(min));
                }
                if let Some(max) = max_items {
                    schema.insert("maxItems".to_string(), json!(max));
                }
                Value::Object(schema)
            }
            Shape::Object { fields } => {
                let mut properties = Map::new();
                for field in fields {
                    properties.insert(field.name.to_string(), field.shape.to_json_schema());
                }
                let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                })
            }
        }
    }
}
