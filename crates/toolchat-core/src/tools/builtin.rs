//! Built-in local tools

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::{ArgMap, ToolSpec};

use super::local::{LocalTool, ToolError};

/// Canned current-weather lookup for a city
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentWeather;

#[async_trait]
impl LocalTool for CurrentWeather {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("get_current_weather", "Get the current weather for a city").with_parameters(
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The name of the city",
                    },
                },
                "required": ["city"],
            }),
        )
    }

    async fn call(&self, args: &ArgMap) -> Result<String, ToolError> {
        let city = args
            .get("city")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .ok_or(ToolError::MissingArgument("city"))?;
        Ok(format!("The weather in {city} is sunny with 25°C"))
    }
}

/// Add two numbers together
#[derive(Debug, Clone, Copy, Default)]
pub struct SumTwoNumbers;

fn number_arg(args: &ArgMap, name: &'static str) -> Result<f64, ToolError> {
    let value = args.get(name).ok_or(ToolError::MissingArgument(name))?;
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| ToolError::InvalidArgument {
            argument: name,
            reason: "not representable as a number".to_string(),
        }),
        // Some models send numbers as strings
        Value::String(s) => s.parse::<f64>().map_err(|e| ToolError::InvalidArgument {
            argument: name,
            reason: e.to_string(),
        }),
        other => Err(ToolError::InvalidArgument {
            argument: name,
            reason: format!("expected a number, got {other}"),
        }),
    }
}

#[async_trait]
impl LocalTool for SumTwoNumbers {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("sum_two_numbers", "Sum two numbers together").with_parameters(json!({
            "type": "object",
            "properties": {
                "number_a": {
                    "type": "number",
                    "description": "First number to add",
                },
                "number_b": {
                    "type": "number",
                    "description": "Second number to add",
                },
            },
            "required": ["number_a", "number_b"],
        }))
    }

    async fn call(&self, args: &ArgMap) -> Result<String, ToolError> {
        let a = number_arg(args, "number_a")?;
        let b = number_arg(args, "number_b")?;
        Ok(format!("The sum of {a} and {b} is {}", a + b))
    }
}

/// Least common multiple of a list of integers
#[derive(Debug, Clone, Copy, Default)]
pub struct Lcm;

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[async_trait]
impl LocalTool for Lcm {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("lcm", "Compute the least common multiple of a list of integers")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "numbers": {
                        "type": "array",
                        "items": { "type": "integer", "minimum": 1 },
                        "description": "The integers to combine",
                    },
                },
                "required": ["numbers"],
            }))
    }

    async fn call(&self, args: &ArgMap) -> Result<String, ToolError> {
        let numbers = args
            .get("numbers")
            .and_then(Value::as_array)
            .ok_or(ToolError::MissingArgument("numbers"))?;
        if numbers.is_empty() {
            return Err(ToolError::InvalidArgument {
                argument: "numbers",
                reason: "the list is empty".to_string(),
            });
        }

        let mut result: u64 = 1;
        for value in numbers {
            let n = value
                .as_u64()
                .filter(|&n| n > 0)
                .ok_or_else(|| ToolError::InvalidArgument {
                    argument: "numbers",
                    reason: format!("{value} is not a positive integer"),
                })?;
            result = (result / gcd(result, n)).checked_mul(n).ok_or_else(|| {
                ToolError::InvalidArgument {
                    argument: "numbers",
                    reason: "the least common multiple overflows a 64-bit integer".to_string(),
                }
            })?;
        }

        Ok(result.to_string())
    }
}
