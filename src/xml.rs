use crate::model::WeatherData;
use chrono::NaiveDateTime;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;
use xml::reader::{EventReader, XmlEvent as ReaderEvent};
use xml::writer::{EventWriter, XmlEvent as WriterEvent};
use xml::EmitterConfig;

const ROOT_TAG: &str = "weatherData";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// accepted on decode: optional fraction, `T` or space separated
const TIMESTAMP_PARSE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Error)]
pub enum XmlCodecError {
    #[error("malformed XML document: {0}")]
    Malformed(#[from] xml::reader::Error),

    #[error("unexpected root element: {0}")]
    UnexpectedRoot(String),

    #[error("invalid {field} value: {value}")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("failed to emit XML document: {0}")]
    Emit(#[from] xml::writer::Error),

    #[error("emitted XML document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render an observation as a `weatherData` document. `id` and `timestamp`
/// appear only when populated; whole-number temperatures render as `16.0`.
pub fn to_xml(data: &WeatherData) -> Result<String, XmlCodecError> {
    let mut buffer = Vec::new();
    let mut writer = EmitterConfig::new().perform_indent(true).create_writer(&mut buffer);

    writer.write(WriterEvent::start_element(ROOT_TAG))?;
    if let Some(id) = data.id {
        write_field(&mut writer, "id", &id.to_string())?;
    }
    write_field(&mut writer, "location", &data.location)?;
    write_field(&mut writer, "temperature", &format_temperature(data.temperature))?;
    write_field(&mut writer, "humidity", &data.humidity.to_string())?;
    if let Some(timestamp) = data.timestamp {
        write_field(&mut writer, "timestamp", &timestamp.format(TIMESTAMP_FORMAT).to_string())?;
    }
    writer.write(WriterEvent::end_element())?;

    Ok(String::from_utf8(buffer)?)
}

fn write_field<W: Write>(
    writer: &mut EventWriter<W>, tag: &str, value: &str,
) -> Result<(), xml::writer::Error> {
    writer.write(WriterEvent::start_element(tag))?;
    writer.write(WriterEvent::characters(value))?;
    writer.write(WriterEvent::end_element())?;
    Ok(())
}

fn format_temperature(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Read an observation out of a `weatherData` document. Only direct children
/// of the root map to fields; unknown elements and their subtrees are skipped.
pub fn from_xml(document: &str) -> Result<WeatherData, XmlCodecError> {
    let parser = EventReader::new(document.as_bytes());
    let mut data = WeatherData::default();
    let mut root_seen = false;
    let mut depth = 0_usize;
    let mut current_element = String::new();
    let mut current_text = String::new();

    for event in parser {
        match event? {
            ReaderEvent::StartElement { name, .. } => {
                if !root_seen {
                    if name.local_name != ROOT_TAG {
                        return Err(XmlCodecError::UnexpectedRoot(name.local_name));
                    }
                    root_seen = true;
                } else {
                    depth += 1;
                    if depth == 1 {
                        current_element = name.local_name;
                        current_text.clear();
                    }
                }
            },
            // text may arrive in pieces, CData among them
            ReaderEvent::Characters(value) | ReaderEvent::CData(value) => {
                if depth == 1 {
                    current_text.push_str(&value);
                }
            },
            ReaderEvent::EndElement { .. } => {
                if depth == 1 {
                    apply_field(&mut data, &current_element, current_text.trim())?;
                    current_element.clear();
                    current_text.clear();
                }
                depth = depth.saturating_sub(1);
            },
            _ => {},
        }
    }

    Ok(data)
}

fn apply_field(data: &mut WeatherData, tag: &str, value: &str) -> Result<(), XmlCodecError> {
    match tag {
        "id" => data.id = Some(parse_value("id", value)?),
        "location" => data.location = value.to_string(),
        "temperature" => data.temperature = parse_value("temperature", value)?,
        "humidity" => data.humidity = parse_value("humidity", value)?,
        "timestamp" => data.timestamp = Some(parse_timestamp(value)?),
        _ => {},
    }

    Ok(())
}

fn parse_value<T: FromStr>(field: &'static str, value: &str) -> Result<T, XmlCodecError> {
    value
        .parse()
        .map_err(|_| XmlCodecError::InvalidFieldValue { field, value: value.to_string() })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, XmlCodecError> {
    TIMESTAMP_PARSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| XmlCodecError::InvalidFieldValue {
            field: "timestamp",
            value: value.to_string(),
        })
}
