#[path = "integration/cli.rs"]
mod cli;
#[path = "integration/properties.rs"]
mod properties;
