use crate::error::{Error, Result};
use serde_json::{Map, Value};

mod link_doublet;

pub use link_doublet::{DEFAULT_PALETTE, LinkDoubletOptions};

/// Key under which link-doublet options live in a [`DeepVisualConfig`].
pub const LINK_DOUBLET_KEY: &str = "linkDoublet";

/// Untyped, mergeable configuration tree.
///
/// Users hand in partial JSON/YAML documents; typed option structs are extracted after merging
/// them over the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepVisualConfig(Value);

impl Default for DeepVisualConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl DeepVisualConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfigJson {
            message: e.to_string(),
        })?;
        Ok(Self(value))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| Error::InvalidConfigYaml {
            message: e.to_string(),
        })?;
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Non-object roots are replaced by an empty object.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Extracts validated link-doublet options: the `linkDoublet` subtree merged over defaults.
    pub fn link_doublet_options(&self) -> Result<LinkDoubletOptions> {
        let mut merged = serde_json::to_value(LinkDoubletOptions::default()).map_err(|e| {
            Error::InvalidConfigJson {
                message: e.to_string(),
            }
        })?;
        if let Some(overrides) = self.get(LINK_DOUBLET_KEY) {
            if !overrides.is_object() {
                return Err(Error::InvalidOption {
                    option: LINK_DOUBLET_KEY.to_string(),
                    message: "expected an object".to_string(),
                });
            }
            deep_merge_value(&mut merged, overrides);
        }
        let options: LinkDoubletOptions =
            serde_json::from_value(merged).map_err(|e| Error::InvalidConfigJson {
                message: e.to_string(),
            })?;
        options.validate()?;
        Ok(options)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeepVisualConfig;
    use crate::ReferenceSyntax;
    use serde_json::json;

    #[test]
    fn dotted_paths_read_and_write_nested_values() {
        let mut cfg = DeepVisualConfig::default();
        cfg.set_value("linkDoublet.radius", json!(8.0));
        cfg.set_value("linkDoublet.cluster", json!(true));
        assert_eq!(cfg.get_f64("linkDoublet.radius"), Some(8.0));
        assert_eq!(cfg.get_bool("linkDoublet.cluster"), Some(true));
        assert_eq!(cfg.get_str("linkDoublet.missing"), None);
    }

    #[test]
    fn set_value_coerces_non_object_roots() {
        let mut cfg = DeepVisualConfig::from_value(json!([1, 2]));
        cfg.set_value("a.b", json!("c"));
        assert_eq!(cfg.as_value(), &json!({"a": {"b": "c"}}));
    }

    #[test]
    fn deep_merge_replaces_leaves_and_keeps_siblings() {
        let mut cfg = DeepVisualConfig::from_value(json!({"linkDoublet": {"radius": 5, "cluster": false}}));
        cfg.deep_merge(&json!({"linkDoublet": {"cluster": true}}));
        assert_eq!(
            cfg.as_value(),
            &json!({"linkDoublet": {"radius": 5, "cluster": true}})
        );
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let opts = DeepVisualConfig::default().link_doublet_options().unwrap();
        assert_eq!(opts.radius, 5.0);
        assert_eq!(opts.max_passes, 100);
        assert!(!opts.cluster);
        assert_eq!(opts.reference_syntax, ReferenceSyntax::Explicit);
    }

    #[test]
    fn options_merge_partial_overrides() {
        let cfg = DeepVisualConfig::from_json_str(
            r#"{"linkDoublet": {"radius": 9, "cluster": true, "referenceSyntax": "positional"}}"#,
        )
        .unwrap();
        let opts = cfg.link_doublet_options().unwrap();
        assert_eq!(opts.radius, 9.0);
        assert!(opts.cluster);
        assert_eq!(opts.reference_syntax, ReferenceSyntax::Positional);
        assert_eq!(opts.self_loop_radius, 0.4);
    }

    #[test]
    fn yaml_configs_are_accepted() {
        let cfg = DeepVisualConfig::from_yaml_str("linkDoublet:\n  showLabels: false\n").unwrap();
        assert!(!cfg.link_doublet_options().unwrap().show_labels);
    }

    #[test]
    fn invalid_colors_are_rejected() {
        let cfg = DeepVisualConfig::from_value(json!({"linkDoublet": {"palette": ["red", "nope"]}}));
        let err = cfg.link_doublet_options().unwrap_err();
        assert!(err.to_string().contains("palette[1]"), "{err}");
    }

    #[test]
    fn non_object_section_is_rejected() {
        let cfg = DeepVisualConfig::from_value(json!({"linkDoublet": 3}));
        assert!(cfg.link_doublet_options().is_err());
    }
}
