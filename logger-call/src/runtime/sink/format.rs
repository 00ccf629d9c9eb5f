//! Console-style argument formatting.

use serde_json::Value;

/// Render arguments the way a console renders them.
///
/// When the first argument is a string it is treated as a format string:
/// `%s`, `%d`/`%i`, `%f`, `%o`/`%O` and `%c` each consume one following
/// argument (`%c` consumes its CSS and renders nothing), `%%` is a literal
/// percent. Arguments left over are appended separated by spaces.
pub fn format_console_args(args: &[Value]) -> String {
    let mut rest = args.iter();
    let mut out = String::new();

    match args.first() {
        Some(Value::String(template)) => {
            rest.next();
            let mut chars = template.chars().peekable();
            while let Some(c) = chars.next() {
                if c != '%' {
                    out.push(c);
                    continue;
                }
                let Some(&spec) = chars.peek() else {
                    out.push('%');
                    break;
                };
                if spec == '%' {
                    chars.next();
                    out.push('%');
                    continue;
                }
                if !matches!(spec, 's' | 'd' | 'i' | 'f' | 'o' | 'O' | 'c') {
                    out.push('%');
                    continue;
                }
                let Some(arg) = rest.next() else {
                    out.push('%');
                    continue;
                };
                chars.next();
                match spec {
                    's' => out.push_str(&display_value(arg)),
                    'd' | 'i' => out.push_str(&integer_value(arg)),
                    'f' => out.push_str(&float_value(arg)),
                    'o' | 'O' => out.push_str(&arg.to_string()),
                    _ => {}
                }
            }
        }
        Some(_) => {}
        None => return out,
    }

    for arg in rest {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&display_value(arg));
    }
    out
}

/// Strings render without quotes, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn integer_value(value: &Value) -> String {
    match value.as_f64() {
        Some(n) => format!("{}", n.trunc() as i64),
        None => "NaN".to_string(),
    }
}

fn float_value(value: &Value) -> String {
    match value.as_f64() {
        Some(n) => n.to_string(),
        None => "NaN".to_string(),
    }
}
