// Tagged-list wire encoding for stored stat values
// Level times are stored as { "L": [{ "N": "12.5" }, ...] }

use serde_json::{json, Value};

/// Tag wrapping a list of tagged elements
pub const LIST_TAG: &str = "L";
/// Tag carrying a string-encoded number
pub const NUMBER_TAG: &str = "N";
/// Tag carrying a string
pub const STRING_TAG: &str = "S";

/// Decode one level's tagged time list into ascending seconds.
///
/// Returns `None` when the value is not wrapped as `{ "L": [...] }`.
/// Elements whose number fails to parse (or is not finite) are dropped.
pub fn decode_times(value: &Value) -> Option<Vec<f64>> {
    let items = value.get(LIST_TAG)?.as_array()?;

    let mut times: Vec<f64> = items.iter().filter_map(decode_tagged_float).collect();
    times.sort_by(|a, b| a.total_cmp(b));

    Some(times)
}

/// Decode one level's times as sent by a client: either the tagged list or a
/// plain array of numbers (or numeric strings). Returns `None` for any other shape.
pub fn decode_times_lenient(value: &Value) -> Option<Vec<f64>> {
    let Some(items) = value.as_array() else {
        return decode_times(value);
    };

    let mut times: Vec<f64> = items
        .iter()
        .filter_map(|item| match item {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Object(_) => decode_tagged_float(item),
            _ => None,
        })
        .filter(|t| t.is_finite())
        .collect();
    times.sort_by(|a, b| a.total_cmp(b));

    Some(times)
}

/// Encode times into the tagged list form, sorted ascending
pub fn encode_times(times: &[f64]) -> Value {
    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let items: Vec<Value> = sorted
        .iter()
        .map(|t| json!({ NUMBER_TAG: t.to_string() }))
        .collect();

    json!({ LIST_TAG: items })
}

/// Read an integer from a plain number, a numeric string or a `{ "N": "..." }` value.
/// Floats are truncated toward zero.
pub fn decode_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_integer(s),
        Value::Object(_) => value.get(NUMBER_TAG).and_then(decode_integer),
        _ => None,
    }
}

/// Read a string from a plain string or a `{ "S": "..." }` value
pub fn decode_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(_) => value.get(STRING_TAG).and_then(|v| v.as_str()),
        _ => None,
    }
}

fn decode_tagged_float(item: &Value) -> Option<f64> {
    let parsed = match item.get(NUMBER_TAG)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|t| t.is_finite())
}

fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_times_drops_bad_entries() {
        let raw = json!({ "L": [{ "N": "12.5" }, { "N": "bad" }, { "N": "3.2" }] });
        assert_eq!(decode_times(&raw), Some(vec![3.2, 12.5]));
    }

    #[test]
    fn test_decode_times_requires_wrapper() {
        assert_eq!(decode_times(&json!([1.0, 2.0])), None);
        assert_eq!(decode_times(&json!({ "L": "nope" })), None);
        assert_eq!(decode_times(&json!({ "L": [] })), Some(vec![]));
    }

    #[test]
    fn test_decode_times_rejects_non_finite() {
        let raw = json!({ "L": [{ "N": "NaN" }, { "N": "inf" }, { "N": 4 }, { "S": "1" }] });
        assert_eq!(decode_times(&raw), Some(vec![4.0]));
    }

    #[test]
    fn test_decode_times_lenient_shapes() {
        assert_eq!(decode_times_lenient(&json!([12.5, "3.2", "bad", null])), Some(vec![3.2, 12.5]));
        assert_eq!(
            decode_times_lenient(&json!({ "L": [{ "N": "9" }, { "N": "1.5" }] })),
            Some(vec![1.5, 9.0])
        );
        assert_eq!(decode_times_lenient(&json!([])), Some(vec![]));
        assert_eq!(decode_times_lenient(&json!("fast")), None);
        assert_eq!(decode_times_lenient(&json!({ "times": [1.0] })), None);
    }

    #[test]
    fn test_encode_then_decode_sorts() {
        let encoded = encode_times(&[9.75, 1.5, 4.0]);
        assert_eq!(encoded["L"][0]["N"], "1.5");
        assert_eq!(decode_times(&encoded), Some(vec![1.5, 4.0, 9.75]));
    }

    #[test]
    fn test_decode_integer_shapes() {
        assert_eq!(decode_integer(&json!(7)), Some(7));
        assert_eq!(decode_integer(&json!(-3)), Some(-3));
        assert_eq!(decode_integer(&json!(5.9)), Some(5));
        assert_eq!(decode_integer(&json!(" 42 ")), Some(42));
        assert_eq!(decode_integer(&json!({ "N": "15" })), Some(15));
        assert_eq!(decode_integer(&json!("twelve")), None);
        assert_eq!(decode_integer(&json!(null)), None);
        assert_eq!(decode_integer(&json!(true)), None);
    }

    #[test]
    fn test_decode_string_shapes() {
        assert_eq!(decode_string(&json!("alice")), Some("alice"));
        assert_eq!(decode_string(&json!({ "S": "bob" })), Some("bob"));
        assert_eq!(decode_string(&json!(12)), None);
    }
}
