use crate::model::binding::Bind;

/// Style and interaction properties shared by every node type, pre-parsed
/// from the raw `commonProps` block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommonProps {
    pub visible: Option<Bind<bool>>,
    pub width: Option<Bind<f64>>,
    pub height: Option<Bind<f64>>,
    pub padding: Option<Bind<f64>>,
    pub background_color: Option<Bind<String>>,
}

impl CommonProps {
    pub fn from_raw(raw: Option<&serde_json::Value>) -> CommonProps {
        let Some(serde_json::Value::Object(map)) = raw else {
            return CommonProps::default();
        };
        CommonProps {
            visible: map.get("visible").and_then(Bind::from_raw),
            width: map.get("width").and_then(Bind::from_raw),
            height: map.get("height").and_then(Bind::from_raw),
            padding: map.get("padding").and_then(Bind::from_raw),
            background_color: map.get("backgroundColor").and_then(Bind::from_raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_block_yields_defaults() {
        let props = CommonProps::from_raw(None);
        assert_eq!(props, CommonProps::default());
    }

    #[test]
    fn parses_literal_and_expression_fields() {
        let raw = json!({
            "visible": "$.state.shown",
            "width": 320,
            "backgroundColor": "surface"
        });
        let props = CommonProps::from_raw(Some(&raw));

        assert!(props.visible.as_ref().unwrap().is_expr());
        assert_eq!(props.width, Some(Bind::Value(320.0)));
        assert_eq!(
            props.background_color,
            Some(Bind::Value("surface".to_string()))
        );
        assert_eq!(props.height, None);
    }
}
