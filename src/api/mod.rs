// Record store clients
pub mod dynamo;
pub mod store;
