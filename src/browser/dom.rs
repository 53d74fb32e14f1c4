//! Raw element records emitted by the Playwright helper.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::types::{display_name, Geometry, RenderedElement};

/// One line of helper output.
#[derive(Debug, Deserialize)]
pub(crate) struct ScriptResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub elements: Vec<RawElement>,
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// Raw element as returned by the extraction script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawElement {
    pub selector: String,
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub bounding_box: RawBoundingBox,
    #[serde(default)]
    pub computed_style: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts raw script elements, dropping empty computed-style values.
pub(crate) fn convert_raw_elements(raw: Vec<RawElement>) -> Vec<RenderedElement> {
    raw.into_iter()
        .map(|el| {
            let classes: Vec<&str> = el.classes.iter().map(String::as_str).collect();
            let name = display_name(&el.tag, el.id.as_deref(), &classes);
            let mut element = RenderedElement::new(
                el.selector,
                name,
                Geometry::new(
                    el.bounding_box.x,
                    el.bounding_box.y,
                    el.bounding_box.width,
                    el.bounding_box.height,
                ),
            );
            element.computed_style = el
                .computed_style
                .into_iter()
                .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
                .collect();
            element
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_script_output_into_rendered_elements() {
        let line = r#"{"status":"ok","screenshot":"/tmp/Desktop.png","elements":[
            {"selector":"body > form > button:nth-of-type(1)","tag":"BUTTON","id":"buy",
             "classes":["btn","submit-btn"],
             "boundingBox":{"x":8,"y":16.5,"width":123,"height":40},
             "computedStyle":{"font-size":"16px","color":"rgb(0, 0, 0)","margin":"","padding":null}}
        ]}"#;
        let response: ScriptResponse = serde_json::from_str(line).expect("parse response");
        assert_eq!(response.status, "ok");
        assert_eq!(response.screenshot.as_deref(), Some("/tmp/Desktop.png"));

        let elements = convert_raw_elements(response.elements);
        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert_eq!(el.display_name, "button#buy.btn.submit-btn");
        assert_eq!(el.geometry, Geometry::new(8.0, 16.5, 123.0, 40.0));
        assert_eq!(el.computed_style.len(), 2);
        assert_eq!(el.computed_style.get("font-size").map(String::as_str), Some("16px"));
    }

    #[test]
    fn error_response_carries_message() {
        let response: ScriptResponse =
            serde_json::from_str(r#"{"status":"error","message":"net::ERR_CONNECTION_REFUSED"}"#)
                .unwrap();
        assert_eq!(response.status, "error");
        assert!(response.elements.is_empty());
        assert_eq!(
            response.message.as_deref(),
            Some("net::ERR_CONNECTION_REFUSED")
        );
    }
}
