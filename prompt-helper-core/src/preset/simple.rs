//! Flattening of simple (text) presets from CSV tables and YAML documents.

use super::{PresetEntry, PresetError, preset_key};
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{
    self, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::fmt;
use std::path::Path;

/// YAML merge key (`<<: *anchor`).
const MERGE_KEY: &str = "<<";

/// Shape of a YAML document node, resolved once per level.
///
/// Mappings follow the loader semantics preset files are written against:
/// a repeated key keeps its first position and its last value, and `<<`
/// merge keys are expanded with explicit keys taking precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

impl Node {
    fn describe(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Scalar(serde_yaml::Number::from(v).to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Scalar(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Scalar(String::new()))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut own: IndexMap<String, Node> = IndexMap::new();
        let mut merge = None;
        while let Some(key) = map.next_key::<Node>()? {
            let key = match key {
                Node::Scalar(key) => key,
                other => {
                    return Err(de::Error::custom(format!(
                        "mapping key is a {}, expected text",
                        other.describe()
                    )));
                }
            };
            let value: Node = map.next_value()?;
            if key == MERGE_KEY {
                merge = Some(value);
            } else {
                own.insert(key, value);
            }
        }

        let mut entries: IndexMap<String, Node> = IndexMap::new();
        if let Some(merge) = merge {
            // Earlier sources in a `<<: [*a, *b]` list take precedence.
            for source in merge_sources::<A::Error>(merge)?.into_iter().rev() {
                entries.extend(source);
            }
        }
        entries.extend(own);
        Ok(Node::Mapping(entries.into_iter().collect()))
    }

    fn visit_enum<A>(self, data: A) -> Result<Node, A::Error>
    where
        A: EnumAccess<'de>,
    {
        // Local tags (`!foo value`) carry no meaning for presets.
        let (_, contents): (IgnoredAny, _) = data.variant()?;
        contents.newtype_variant()
    }
}

fn merge_sources<E: de::Error>(merge: Node) -> Result<Vec<Vec<(String, Node)>>, E> {
    match merge {
        Node::Mapping(entries) => Ok(vec![entries]),
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(entries) => Ok(entries),
                other => Err(E::custom(format!(
                    "merge list entry is a {}, expected a mapping",
                    other.describe()
                ))),
            })
            .collect(),
        other => Err(E::custom(format!(
            "merge key holds a {}, expected a mapping",
            other.describe()
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    prompt: String,
}

/// Flatten a CSV table with `name` and `prompt` columns.
pub fn flatten_csv(
    stem: &str,
    content: &str,
    path: &Path,
) -> Result<Vec<(String, PresetEntry)>, PresetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut out = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| PresetError::parse(path, format!("row {}: {e}", line + 1)))?;
        out.push((preset_key(stem, &row.name), PresetEntry::simple(row.prompt)));
    }
    Ok(out)
}

/// Flatten a YAML document.
///
/// - a top-level list keys each entry by the text before its first comma;
/// - a top-level mapping keys scalars by name, nested mappings by `k.k2`, and
///   nested lists by `k.<text before first comma>`;
/// - an empty or scalar document yields nothing.
pub fn flatten_yaml(
    stem: &str,
    content: &str,
    path: &Path,
) -> Result<Vec<(String, PresetEntry)>, PresetError> {
    let node: Node =
        serde_yaml::from_str(content).map_err(|e| PresetError::parse(path, e.to_string()))?;

    let mut out = Vec::new();
    match node {
        Node::Sequence(items) => push_list(stem, None, items, path, &mut out)?,
        Node::Mapping(entries) => {
            for (key, value) in entries {
                match value {
                    Node::Scalar(text) => {
                        out.push((preset_key(stem, &key), PresetEntry::simple(text)))
                    }
                    Node::Sequence(items) => push_list(stem, Some(&key), items, path, &mut out)?,
                    Node::Mapping(nested) => {
                        for (key2, value2) in nested {
                            let text = match value2 {
                                Node::Scalar(text) => text,
                                other => {
                                    return Err(PresetError::parse(
                                        path,
                                        format!(
                                            "'{key}.{key2}' holds a {}, expected text",
                                            other.describe()
                                        ),
                                    ));
                                }
                            };
                            out.push((
                                preset_key(stem, &format!("{key}.{key2}")),
                                PresetEntry::simple(text),
                            ));
                        }
                    }
                }
            }
        }
        Node::Scalar(_) => {}
    }
    Ok(out)
}

fn push_list(
    stem: &str,
    prefix: Option<&str>,
    items: Vec<Node>,
    path: &Path,
    out: &mut Vec<(String, PresetEntry)>,
) -> Result<(), PresetError> {
    for item in items {
        let text = match item {
            Node::Scalar(text) => text,
            other => {
                return Err(PresetError::parse(
                    path,
                    format!("list entry is a {}, expected text", other.describe()),
                ));
            }
        };
        let head = text.split(',').next().unwrap_or_default();
        let qualifier = match prefix {
            Some(prefix) => format!("{prefix}.{head}"),
            None => head.to_string(),
        };
        out.push((preset_key(stem, &qualifier), PresetEntry::simple(text)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(entries: &[(String, PresetEntry)], key: &str) -> String {
        entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_text())
            .unwrap_or_else(|| panic!("missing key {key}"))
            .to_string()
    }

    #[test]
    fn csv_rows_keep_prompt_verbatim() {
        let content = "name,prompt\nportrait,\"  soft light, 85mm \"\nlandscape,wide angle\n";
        let entries = flatten_csv("styles", content, Path::new("styles.csv")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "styles: portrait");
        assert_eq!(text(&entries, "styles: portrait"), "  soft light, 85mm ");
        assert_eq!(text(&entries, "styles: landscape"), "wide angle");
    }

    #[test]
    fn csv_extra_columns_are_ignored() {
        let content = "name,prompt,notes\nink,ink drawing,unused\n";
        let entries = flatten_csv("art", content, Path::new("art.csv")).unwrap();
        assert_eq!(text(&entries, "art: ink"), "ink drawing");
    }

    #[test]
    fn csv_without_prompt_column_fails() {
        let content = "title,body\nink,ink drawing\n";
        let err = flatten_csv("art", content, Path::new("art.csv")).unwrap_err();
        assert!(matches!(err, PresetError::Parse { .. }));
    }

    #[test]
    fn yaml_list_uses_leading_token() {
        let content = "- cat, fluffy, (orange:1.2)\n- dog\n";
        let entries = flatten_yaml("animals", content, Path::new("animals.yml")).unwrap();
        assert_eq!(text(&entries, "animals: cat"), "cat, fluffy, (orange:1.2)");
        assert_eq!(text(&entries, "animals: dog"), "dog");
    }

    #[test]
    fn yaml_mapping_flattens_each_shape() {
        let content = r#"
quality: masterpiece, best quality
lighting:
  soft: soft light
  hard: hard shadows
colors:
  - red, crimson
  - blue
steps: 30
"#;
        let entries = flatten_yaml("misc", content, Path::new("misc.yaml")).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "misc: quality",
                "misc: lighting.soft",
                "misc: lighting.hard",
                "misc: colors.red",
                "misc: colors.blue",
                "misc: steps",
            ]
        );
        assert_eq!(text(&entries, "misc: colors.red"), "red, crimson");
        assert_eq!(text(&entries, "misc: steps"), "30");
    }

    #[test]
    fn yaml_empty_document_yields_nothing() {
        let entries = flatten_yaml("empty", "", Path::new("empty.yml")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn yaml_too_deep_nesting_is_rejected() {
        let content = "a:\n  b:\n    c: deep\n";
        let err = flatten_yaml("deep", content, Path::new("deep.yml")).unwrap_err();
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn yaml_repeated_key_keeps_last_value() {
        let content = "ink: first\nwash: watercolor\nink: second\n";
        let entries = flatten_yaml("dup", content, Path::new("dup.yml")).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["dup: ink", "dup: wash"]);
        assert_eq!(text(&entries, "dup: ink"), "second");
    }

    #[test]
    fn yaml_merge_key_expands_anchor() {
        let content = "base: &b\n  a: x\n  c: base\nderived:\n  <<: *b\n  c: y\n";
        let entries = flatten_yaml("m", content, Path::new("m.yml")).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["m: base.a", "m: base.c", "m: derived.a", "m: derived.c"]);
        assert_eq!(text(&entries, "m: derived.a"), "x");
        assert_eq!(text(&entries, "m: derived.c"), "y");
    }

    #[test]
    fn yaml_merge_list_prefers_earlier_sources() {
        let content = "one: &one\n  k: first\ntwo: &two\n  k: second\n  only: two\nboth:\n  <<: [*one, *two]\n";
        let entries = flatten_yaml("m", content, Path::new("m.yml")).unwrap();
        assert_eq!(text(&entries, "m: both.k"), "first");
        assert_eq!(text(&entries, "m: both.only"), "two");
    }

    #[test]
    fn yaml_merge_of_scalar_is_rejected() {
        let content = "bad:\n  <<: plain\n";
        let err = flatten_yaml("m", content, Path::new("m.yml")).unwrap_err();
        assert!(matches!(err, PresetError::Parse { .. }));
    }

    #[test]
    fn yaml_local_tags_are_ignored() {
        let content = "style: !custom soft light\n";
        let entries = flatten_yaml("t", content, Path::new("t.yml")).unwrap();
        assert_eq!(text(&entries, "t: style"), "soft light");
    }

    #[test]
    fn yaml_syntax_error_names_file() {
        let err = flatten_yaml("bad", "key: [unclosed", Path::new("dir/bad.yml")).unwrap_err();
        assert!(err.to_string().contains("dir/bad.yml"));
    }
}
