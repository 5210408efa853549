use serde::Serialize;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Invalid format: {}. Valid options are: json, yaml", s)),
        }
    }
}

/// Render a response for stdout
pub fn render<T: Serialize>(value: &T, format: &OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yml::to_string(value)?),
    };
    Ok(rendered)
}

pub fn print<T: Serialize>(value: &T, format: &OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}
