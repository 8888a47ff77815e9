use std::io::IsTerminal;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

pub mod table;

use table::TableOptions;

static TABLE_OPTIONS: OnceLock<TableOptions> = OnceLock::new();

/// Fix the table style for this process from the global flags and terminal.
pub fn configure(flags: &GlobalFlags) {
    let width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok());
    let _ = TABLE_OPTIONS.set(table_options(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        width,
    ));
}

/// Colors only ever apply to table output. Widths under 40 columns are
/// ignored.
fn table_options(
    flags: &GlobalFlags,
    stdout_is_tty: bool,
    no_color: bool,
    columns: Option<usize>,
) -> TableOptions {
    let table = flags.format == OutputFormat::Table;
    let color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => table && !flags.quiet && stdout_is_tty && !no_color,
    };
    TableOptions {
        max_width: columns.filter(|width| *width >= 40),
        color,
    }
}

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_value_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render pre-built rows with the terminal's table preferences.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let options = TABLE_OPTIONS.get().copied().unwrap_or(TableOptions {
        max_width: None,
        color: false,
    });
    table::render_table(headers, rows, options)
}

fn render_value_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_array_table(items),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            table(&["key", "value"], &rows)
        }
        scalar => table(&["value"], &[vec![value_to_cell(scalar)]]),
    }
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table(&["value"], &rows);
    }

    // Columns in first-seen order across all rows.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table(&header_refs, &rows)
}

pub fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) if v.is_f64() => v.as_f64().map_or_else(|| v.to_string(), format_score),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

/// Scores are shown with four decimals in tables.
pub fn format_score(value: f64) -> String {
    format!("{value:.4}")
}
