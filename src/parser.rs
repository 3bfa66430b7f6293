//! Parse document literals and path expressions using PEST.

use crate::path::Segment;
use crate::value::Value;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::collections::BTreeMap;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct DocumentParser;

/// Parse a document literal (schema or value text) into a [Value].
///
/// Accepts any top-level value; whether a document is usable as a schema is
/// decided later, at [crate::Schema::resolve]. Duplicate map keys are a
/// parse error.
pub fn parse(source: &str) -> Result<Value, String> {
    let pairs = DocumentParser::parse(Rule::document, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let document = pairs.into_iter().next().ok_or("Empty parse")?;
    let node = document
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or("Empty document")?;
    build_value(node)
}

fn build_value(pair: Pair<Rule>) -> Result<Value, String> {
    match pair.as_rule() {
        Rule::mapping => build_mapping(pair),
        Rule::sequence => {
            let mut items = Vec::new();
            for inner in pair.into_inner() {
                items.push(build_value(inner)?);
            }
            Ok(Value::List(items))
        }
        Rule::number => pair
            .as_str()
            .parse::<u64>()
            .map(Value::Int)
            .map_err(|e| format!("number `{}`: {}", pair.as_str(), e)),
        Rule::boolean => Ok(Value::Bool(pair.as_str() == "true")),
        Rule::null => Ok(Value::Null),
        Rule::string => Ok(Value::Str(string_contents(pair))),
        other => Err(format!("unexpected rule: {:?}", other)),
    }
}

fn build_mapping(pair: Pair<Rule>) -> Result<Value, String> {
    let mut entries = BTreeMap::new();
    for entry in pair.into_inner() {
        let mut it = entry.into_inner();
        let key_pair = it.next().ok_or("pair: missing key")?;
        let key = match key_pair.as_rule() {
            Rule::string => string_contents(key_pair),
            Rule::bare_key => key_pair.as_str().to_string(),
            other => return Err(format!("unexpected key rule: {:?}", other)),
        };
        let value_pair = it.next().ok_or("pair: missing value")?;
        let value = build_value(value_pair)?;
        if entries.insert(key.clone(), value).is_some() {
            return Err(format!("Duplicate key: {}", key));
        }
    }
    Ok(Value::Map(entries))
}

fn string_contents(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

/// Parse a field path expression (`items[2].name`) into segments.
pub(crate) fn parse_path(source: &str) -> Result<Vec<Segment>, String> {
    let pairs = DocumentParser::parse(Rule::path, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let path = pairs.into_iter().next().ok_or("Empty parse")?;
    let mut segments = Vec::new();
    for part in path.into_inner() {
        match part.as_rule() {
            Rule::name_segment => segments.push(Segment::Key(part.as_str().to_string())),
            Rule::index_segment => {
                let digits = part.into_inner().next().ok_or("index: missing digits")?;
                let index = digits
                    .as_str()
                    .parse::<usize>()
                    .map_err(|e| format!("index `{}`: {}", digits.as_str(), e))?;
                segments.push(Segment::Index(index));
            }
            Rule::EOI => {}
            other => return Err(format!("unexpected path rule: {:?}", other)),
        }
    }
    if segments.is_empty() {
        return Err("empty path".to_string());
    }
    Ok(segments)
}
