//! Current date/time tool.
//!
//! Reports the host's local wall-clock time. The `timezone` argument is
//! echoed as a label; no conversion is performed.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use rustedreact_core::error::ToolError;
use rustedreact_core::tool::{Tool, ToolParams, check_params};

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Returns current date and time. Input: timezone (optional, defaults to UTC). Example: get_current_time(timezone='UTC')"
    }

    async fn call(&self, params: ToolParams) -> Result<String, ToolError> {
        check_params(&params, &["timezone"])?;
        let timezone = match params.get("timezone") {
            None | Some(serde_json::Value::Null) => "UTC",
            Some(serde_json::Value::String(tz)) => tz.as_str(),
            Some(other) => {
                return Err(ToolError::InvalidArguments(format!(
                    "'timezone' must be a string, got {other}"
                )));
            }
        };

        Ok(format_time(&Local::now(), timezone))
    }
}

/// `Current time: YYYY-MM-DD HH:MM:SS <label>`
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>, label: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Current time: {} {label}", now.format("%Y-%m-%d %H:%M:%S"))
}
