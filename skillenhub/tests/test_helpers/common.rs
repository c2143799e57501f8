use std::sync::Arc;
use skillenhub::{error::HubError, HubRuntime, HubRuntimeBuilder};

/// Creates a test runtime with a fresh in-memory database
pub fn create_test_runtime() -> Result<Arc<HubRuntime>, HubError> {
    // Initialize logger only once
    let _ = env_logger::builder().is_test(true).try_init();

    let runtime = HubRuntimeBuilder::new().use_in_memory_db().build()?;
    Ok(Arc::new(runtime))
}
