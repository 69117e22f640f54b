use super::DispatchTool;
use crate::client::CommanderClient;

pub struct GoToTargetTool;

impl DispatchTool for GoToTargetTool {
    fn name(&self) -> &str {
        "go_to_target"
    }

    fn description(&self) -> &str {
        "Move towards the target specified by target_id (for driving simulator). \
         The id must be one of the targets returned by get_target_places."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "target_id": {
                    "type": "integer",
                    "description": "Target ID"
                }
            },
            "required": ["target_id"]
        })
    }

    fn call(
        &self,
        args: serde_json::Value,
        client: &CommanderClient,
    ) -> Result<serde_json::Value, String> {
        let target_id = args["target_id"]
            .as_i64()
            .ok_or_else(|| "missing required argument: target_id".to_string())?;

        client.go_to_target(target_id).map_err(|e| e.to_string())?;
        Ok(serde_json::json!({ "success": true, "target": target_id }))
    }
}
