use serde::de::{Deserialize, Deserializer};
use serde::Serialize;
use serde_json::Value;

use crate::common::command::{LEGACY_ELEMENTID, MAGIC_ELEMENTID};
use crate::common::types::ElementId;
use crate::error::{WebDriverError, WebDriverErrorInfo, WebDriverResult};

/// A decoded element reference.
///
/// Accepts either the W3C identifier key or the legacy `ELEMENT` key, so
/// downstream code has a single lookup path regardless of which convention
/// the driver uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf", alias = "ELEMENT")]
    pub id: String,
}

impl ElementRef {
    pub fn element_id(&self) -> ElementId {
        ElementId::from(self.id.clone())
    }
}

/// The decoded `value` field of a WebDriver response envelope.
///
/// Decoding tries scalar and array interpretations first, then falls back
/// to an element reference if an element-identifier key is present, and
/// finally to an error object. Every branch is guarded; malformed input
/// produces an error, never a panic.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Element(ElementRef),
    List(Vec<ResponseValue>),
    Error(WebDriverErrorInfo),
}

impl ResponseValue {
    fn decode(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(ResponseValue::Null),
            Value::Bool(b) => Ok(ResponseValue::Bool(b)),
            Value::Number(n) => Ok(ResponseValue::Number(n)),
            Value::String(s) => Ok(ResponseValue::String(s)),
            Value::Array(items) => Ok(ResponseValue::List(
                items
                    .into_iter()
                    .map(ResponseValue::decode)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Value::Object(map) => {
                let is_element_ref =
                    map.contains_key(MAGIC_ELEMENTID) || map.contains_key(LEGACY_ELEMENTID);
                let value = Value::Object(map);
                if is_element_ref {
                    serde_json::from_value(value).map(ResponseValue::Element)
                } else {
                    serde_json::from_value(value).map(ResponseValue::Error)
                }
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResponseValue::Null)
    }

    /// The error object carried by this value, if any.
    pub fn error_info(&self) -> Option<&WebDriverErrorInfo> {
        match self {
            ResponseValue::Error(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> WebDriverResult<bool> {
        match self {
            ResponseValue::Bool(b) => Ok(*b),
            v => Err(unexpected("boolean", v)),
        }
    }

    pub fn into_string(self) -> WebDriverResult<String> {
        match self {
            ResponseValue::String(s) => Ok(s),
            v => Err(unexpected("string", &v)),
        }
    }

    /// A string value that the endpoint is allowed to omit, e.g. element
    /// attributes and properties.
    pub fn into_opt_string(self) -> WebDriverResult<Option<String>> {
        match self {
            ResponseValue::Null => Ok(None),
            ResponseValue::String(s) => Ok(Some(s)),
            ResponseValue::Bool(b) => Ok(Some(b.to_string())),
            ResponseValue::Number(n) => Ok(Some(n.to_string())),
            v => Err(unexpected("scalar or null", &v)),
        }
    }

    pub fn into_element(self) -> WebDriverResult<ElementRef> {
        match self {
            ResponseValue::Element(e) => Ok(e),
            v => Err(unexpected("element reference", &v)),
        }
    }

    pub fn into_list(self) -> WebDriverResult<Vec<ResponseValue>> {
        match self {
            ResponseValue::List(items) => Ok(items),
            v => Err(unexpected("list", &v)),
        }
    }
}

fn unexpected(wanted: &str, got: &ResponseValue) -> WebDriverError {
    WebDriverError::UnknownResponse(format!("expected {}, got {:?}", wanted, got))
}

/// The WebDriver response envelope: a JSON object with a single `value`
/// key, decoded per the polymorphism rules of [`ResponseValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub value: ResponseValue,
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Envelope {
            value: Value,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        let value = ResponseValue::decode(envelope.value).map_err(serde::de::Error::custom)?;
        Ok(Response { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Response {
        serde_json::from_str(body).expect("valid envelope")
    }

    #[test]
    fn decodes_w3c_element_ref() {
        let res = parse(r#"{"value":{"element-6066-11e4-a52e-4f735466cecf":"abc123"}}"#);
        assert_eq!(
            res.value,
            ResponseValue::Element(ElementRef {
                id: "abc123".to_string()
            })
        );
    }

    #[test]
    fn decodes_legacy_element_ref() {
        let res = parse(r#"{"value":{"ELEMENT":"xyz"}}"#);
        assert_eq!(res.value.into_element().unwrap().id, "xyz");
    }

    #[test]
    fn decodes_error_object() {
        let res = parse(r#"{"value":{"error":"no such element","message":"m"}}"#);
        let info = res.value.error_info().cloned().unwrap();
        assert_eq!(info.error, "no such element");
        assert_eq!(info.message, "m");
    }

    #[test]
    fn decodes_scalars() {
        assert_eq!(
            parse(r#"{"value":"hello"}"#).value,
            ResponseValue::String("hello".to_string())
        );
        assert_eq!(parse(r#"{"value":true}"#).value, ResponseValue::Bool(true));
        assert!(parse(r#"{"value":null}"#).value.is_null());
    }

    #[test]
    fn decodes_element_list_elementwise() {
        let res = parse(
            r#"{"value":[{"element-6066-11e4-a52e-4f735466cecf":"e1"},{"ELEMENT":"e2"}]}"#,
        );
        let items = res.value.into_list().unwrap();
        let ids: Vec<String> = items
            .into_iter()
            .map(|v| v.into_element().unwrap().id)
            .collect();
        assert_eq!(ids, vec!["e1".to_string(), "e2".to_string()]);
    }

    #[test]
    fn guarded_accessors_reject_mismatches() {
        let res = parse(r#"{"value":"hello"}"#);
        assert!(res.value.as_bool().is_err());
    }
}
