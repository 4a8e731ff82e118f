use anyhow::Result;
use pii_config::Config;
use pii_core::Record;
use pii_engine::RecordProcessor;

pub fn handle(config: &Config, id: &str, json: &str) -> Result<()> {
    let record = Record::from_json(id, json)?;
    let processor = RecordProcessor::new(config);

    let output = processor.process(&record);
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
