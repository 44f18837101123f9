//! Canned city weather lookup

use super::base::Tool;
use super::types::{ToolCall, ToolSchema};
use crate::error::{PonderError, PonderResult};
use async_trait::async_trait;
use serde_json::json;

const FORECASTS: [(&str, &str); 3] = [
    ("台北", "台北下大雨，氣溫 18 度"),
    ("台中", "台中晴天，氣溫 26 度"),
    ("高雄", "高雄多雲，氣溫 30 度"),
];

const UNKNOWN_CITY: &str = "資料庫沒有這個城市的資料";

/// `get_weather(city)`: the first known city contained in the argument wins
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "查詢指定城市的天氣。輸入參數 city 必須是城市名稱。"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string", "description": "城市名稱"}
                },
                "required": ["city"]
            }),
        )
    }

    async fn execute(&self, call: &ToolCall) -> PonderResult<String> {
        let city = call
            .get_string("city")
            .ok_or_else(|| PonderError::invalid_input_field("missing argument 'city'", "city"))?;

        let forecast = FORECASTS
            .iter()
            .find(|(name, _)| city.contains(name))
            .map_or(UNKNOWN_CITY, |(_, forecast)| *forecast);
        Ok(forecast.to_string())
    }
}
