use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::io::Cursor;

use coinreturns_lib::{Availability, ComparisonResult};

use crate::output::PricesOutput;

/// Singularize array field names for XML child elements.
fn singular(field: &str) -> &str {
    match field {
        "entries" => "entry",
        "availability" => "asset",
        "rows" => "row",
        _ => field,
    }
}

/// Recursively write a serde_json::Value as XML elements.
fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &serde_json::Value,
) -> Result<(), quick_xml::Error> {
    match value {
        serde_json::Value::Null => {
            // Omit null fields entirely
        }
        serde_json::Value::Bool(b) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(if *b {
                "true"
            } else {
                "false"
            })))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Number(n) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            let s = n.to_string();
            writer.write_event(Event::Text(BytesText::new(&s)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::String(s) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(s)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(tag)))?;
                return Ok(());
            }
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            let child_tag = singular(tag);
            for item in arr {
                write_value(writer, child_tag, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, val) in map {
                write_value(writer, key, val)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }
    Ok(())
}

/// Serialize `item` as an XML document with `root_tag` as the root element.
fn to_xml<T: Serialize>(root_tag: &str, item: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(item)?;
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_value(&mut writer, root_tag, &value)?;
    let buf = writer.into_inner().into_inner();
    Ok(String::from_utf8(buf)?)
}

pub fn comparison_to_xml(result: &ComparisonResult) -> anyhow::Result<String> {
    to_xml("comparison", result)
}

pub fn prices_to_xml(out: &PricesOutput) -> anyhow::Result<String> {
    to_xml("prices", out)
}

pub fn availability_to_xml(availability: &[Availability]) -> anyhow::Result<String> {
    to_xml("availability", &availability)
}
