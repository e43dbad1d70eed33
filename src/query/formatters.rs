use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

/// Header row plus data rows extracted from an action result.
struct Rows {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Rows {
    fn from_value(value: &Value) -> Rows {
        match value {
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let mut headers: Vec<String> = Vec::new();
                for item in items.iter().filter_map(Value::as_object) {
                    for key in item.keys() {
                        if !headers.contains(key) {
                            headers.push(key.clone());
                        }
                    }
                }
                let rows = items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|item| row_for(item, &headers))
                    .collect();
                Rows { headers, rows }
            }
            Value::Array(items) => Rows {
                headers: vec!["value".to_string()],
                rows: items.iter().map(|v| vec![v.clone()]).collect(),
            },
            Value::Object(map) => Rows {
                headers: vec!["metric".to_string(), "value".to_string()],
                rows: map
                    .iter()
                    .map(|(k, v)| vec![Value::String(k.clone()), v.clone()])
                    .collect(),
            },
            scalar => Rows {
                headers: vec!["value".to_string()],
                rows: vec![vec![scalar.clone()]],
            },
        }
    }
}

fn row_for(item: &Map<String, Value>, headers: &[String]) -> Vec<Value> {
    headers
        .iter()
        .map(|h| item.get(h).cloned().unwrap_or(Value::Null))
        .collect()
}

fn cell_text(value: &Value, null_text: &str) -> String {
    match value {
        Value::Null => null_text.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

pub fn format_result(value: &Value, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(value),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
        }
        OutputFormat::Csv => format_csv(value),
    }
}

fn format_table(value: &Value) -> String {
    if value.as_array().is_some_and(Vec::is_empty) {
        return "No results found.".to_string();
    }

    let rows = Rows::from_value(value);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(rows.headers.clone());

    for row in &rows.rows {
        table.add_row(row.iter().map(|v| Cell::new(cell_text(v, "N/A"))));
    }

    table.to_string()
}

fn format_csv(value: &Value) -> String {
    let rows = Rows::from_value(value);
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record(&rows.headers);
    for row in &rows.rows {
        let _ = wtr.write_record(row.iter().map(|v| cell_text(v, "")));
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}
