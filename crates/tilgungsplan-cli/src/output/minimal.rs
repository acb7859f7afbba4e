use serde_json::Value;

/// Print just the key answer value from the output.
///
/// For a schedule that is the remaining balance (Restschuld); for a chart
/// series, the last point.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let summary = result_obj.get("summary").unwrap_or(result_obj);

    let priority_keys = [
        "final_balance",
        "total_interest",
        "total_installments",
        "balance",
    ];

    let target = match summary {
        Value::Array(points) => points.last().unwrap_or(summary),
        _ => summary,
    };

    if let Value::Object(map) = target {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(target));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
