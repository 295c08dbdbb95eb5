use std::env;
use std::fs;
use std::sync::Arc;

use engine::{DocumentEngine, EngineError, EngineServices, MemoryStateStore, NodeRegistry, PropValue};

fn main() -> Result<(), EngineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::Document(
            "Usage: render_doc <document.json> [state.json]".to_string(),
        ));
    }

    let document_json = fs::read_to_string(&args[1])?;

    let mut services = EngineServices::default();
    if let Some(state_path) = args.get(2) {
        let state_json = fs::read_to_string(state_path)?;
        let state_value: serde_json::Value = serde_json::from_str(&state_json)?;
        let serde_json::Value::Object(entries) = state_value else {
            return Err(EngineError::Document(
                "State file must contain a JSON object".to_string(),
            ));
        };
        services.state = Arc::new(MemoryStateStore::with_entries(
            entries
                .into_iter()
                .map(|(k, v)| (k, PropValue::from(v)))
                .collect(),
        ));
    }

    let engine = DocumentEngine::from_json(&document_json, NodeRegistry::with_builtins(), services)?;
    let rendered = engine.render();

    println!("Rendered {} widget(s)", rendered.widget_count());
    println!("{:#?}", rendered);

    Ok(())
}
