use shelfdex_core::config::BatchErrorPolicy;
use shelfdex_core::db::SearchField;
use shelfdex_core::format::OutputFormat;

/// Parse batch error policy from string
pub fn parse_batch_policy(s: &str) -> std::result::Result<BatchErrorPolicy, String> {
    s.parse::<BatchErrorPolicy>().map_err(|e| e.to_string())
}

/// Parse search field from string
pub fn parse_search_field(s: &str) -> std::result::Result<SearchField, String> {
    s.parse::<SearchField>().map_err(|e| e.to_string())
}

/// Parse output format from string
pub fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}
