//! Mock lookups used by the weekend planner agent.

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tracing::info;

use super::registry::ToolRegistry;
use super::types::ToolSchema;
use crate::error::ToolError;

const SUNNY_CHANCE: f64 = 0.05;

pub fn weather_report(city: &str, roll: f64) -> Value {
    if roll < SUNNY_CHANCE {
        json!({"city": city, "temperature": 72, "description": "Sunny"})
    } else {
        json!({"city": city, "temperature": 60, "description": "Rainy"})
    }
}

pub fn activities(city: &str) -> Value {
    json!([
        {"name": "Hiking", "location": city},
        {"name": "Beach", "location": city},
        {"name": "Museum", "location": city},
    ])
}

pub fn current_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn string_arg(args: &Value, key: &str) -> Result<String, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("missing string argument: {}", key))
}

fn object_schema(name: &str, description: &str, fields: &[(&str, &str)]) -> ToolSchema {
    let mut properties = serde_json::Map::new();
    for (field, doc) in fields {
        properties.insert(field.to_string(), json!({"type": "string", "description": doc}));
    }
    let required: Vec<&str> = fields.iter().map(|(field, _)| *field).collect();
    ToolSchema {
        name: name.to_string(),
        description: description.to_string(),
        parameters: Some(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })),
    }
}

fn get_weather(args: Value) -> Result<Value, String> {
    let city = string_arg(&args, "city")?;
    info!(city = %city, "getting weather");
    Ok(weather_report(&city, rand::random::<f64>()))
}

fn get_activities(args: Value) -> Result<Value, String> {
    let city = string_arg(&args, "city")?;
    let date = string_arg(&args, "date")?;
    info!(city = %city, date = %date, "getting activities");
    Ok(activities(&city))
}

fn get_current_date(_args: Value) -> Result<Value, String> {
    info!("getting current date");
    Ok(Value::String(current_date()))
}

pub fn register_weekend_tools(registry: &ToolRegistry) -> Result<(), ToolError> {
    registry.register(
        "get_weather",
        Arc::new(get_weather),
        object_schema("get_weather", "Gets the weather forecast for a city.", &[("city", "City name")]),
    )?;
    registry.register(
        "get_activities",
        Arc::new(get_activities),
        object_schema(
            "get_activities",
            "Lists activities available in a city on a date.",
            &[("city", "City name"), ("date", "Date in YYYY-MM-DD format")],
        ),
    )?;
    registry.register(
        "get_current_date",
        Arc::new(get_current_date),
        object_schema(
            "get_current_date",
            "Gets the current date and returns as a string in format YYYY-MM-DD.",
            &[],
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_is_mostly_rainy() {
        assert_eq!(weather_report("Seattle", 0.01)["description"], "Sunny");
        assert_eq!(weather_report("Seattle", 0.01)["temperature"], 72);
        assert_eq!(weather_report("Seattle", 0.5)["description"], "Rainy");
        assert_eq!(weather_report("Seattle", 0.5)["temperature"], 60);
    }

    #[test]
    fn registers_all_three_tools() {
        let registry = ToolRegistry::new();
        register_weekend_tools(&registry).unwrap();
        assert_eq!(registry.count(), 3);

        let result = registry.execute("get_activities", json!({"city": "Seattle", "date": "2025-06-07"}));
        assert!(result.success);
        let output = result.output.unwrap();
        assert_eq!(output.as_array().map(|a| a.len()), Some(3));
        assert_eq!(output[0]["location"], "Seattle");
    }

    #[test]
    fn weather_requires_city() {
        let registry = ToolRegistry::new();
        register_weekend_tools(&registry).unwrap();
        let result = registry.execute("get_weather", json!({}));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("missing string argument: city"));
    }

    #[test]
    fn current_date_is_iso_formatted() {
        let date = current_date();
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}
