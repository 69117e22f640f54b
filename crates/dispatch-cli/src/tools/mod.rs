use crate::client::CommanderClient;

pub mod get_target_places;
pub mod go_to_nearest;
pub mod go_to_target;

pub trait DispatchTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(
        &self,
        args: serde_json::Value,
        client: &CommanderClient,
    ) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn DispatchTool>> {
    vec![
        Box::new(get_target_places::GetTargetPlacesTool),
        Box::new(go_to_nearest::GoToNearestTool),
        Box::new(go_to_target::GoToTargetTool),
    ]
}
