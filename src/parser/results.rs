use crate::app::ports::{FetchedPage, TableParser};
use crate::common::error::{Result, ScraperError};
use crate::common::types::Row;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Payload shapes the result source is known to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// `<results>` block with one `<result>` element per swim, fields as attributes.
    ResultFeed,
    Json,
    HtmlTable,
    Csv,
}

impl PayloadFormat {
    pub fn detect(content_type: &str, text: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        let lower = text.to_ascii_lowercase();
        let trimmed = text.trim_start();

        if content_type.contains("xml") || lower.contains("<xml") || lower.contains("<results") {
            PayloadFormat::ResultFeed
        } else if content_type.contains("json") || trimmed.starts_with('{') || trimmed.starts_with('[')
        {
            PayloadFormat::Json
        } else if content_type.contains("html") || lower.contains("<table") {
            PayloadFormat::HtmlTable
        } else {
            PayloadFormat::Csv
        }
    }
}

/// Default [`TableParser`] for swim meet result pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultsParser;

impl ResultsParser {
    pub fn new() -> Self {
        Self
    }
}

impl TableParser for ResultsParser {
    fn parse(&self, page: &FetchedPage) -> Result<Vec<Row>> {
        let text = decode_body(&page.body, &page.content_type);
        let format = PayloadFormat::detect(&page.content_type, &text);
        debug!(
            "Parsing {} bytes as {:?} (content type '{}')",
            page.body.len(),
            format,
            page.content_type
        );

        let rows = match format {
            PayloadFormat::ResultFeed => parse_result_feed(&text)?,
            PayloadFormat::Json => parse_json(&text)?,
            PayloadFormat::HtmlTable => parse_html_table(&text)?,
            PayloadFormat::Csv => parse_csv(&text)?,
        };

        if rows.is_empty() {
            return Err(ScraperError::parse(format!(
                "{format:?} payload did not include any result rows"
            )));
        }
        info!("Extracted {} rows from {:?} payload", rows.len(), format);
        Ok(rows)
    }
}

fn charset_regex() -> Option<&'static Regex> {
    static CHARSET: OnceLock<Option<Regex>> = OnceLock::new();
    CHARSET
        .get_or_init(|| Regex::new(r"(?i)charset=([^\s;]+)").ok())
        .as_ref()
}

/// Decode the body as UTF-8. Other declared charsets are decoded lossily too.
fn decode_body(body: &[u8], content_type: &str) -> String {
    if let Some(caps) = charset_regex().and_then(|re| re.captures(content_type)) {
        let charset = caps[1].trim_matches('"').to_ascii_lowercase();
        if !matches!(charset.as_str(), "utf-8" | "utf8" | "us-ascii" | "ascii") {
            warn!("Unsupported charset '{}', decoding as UTF-8", charset);
        }
    }
    String::from_utf8_lossy(body).into_owned()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::parse(format!("invalid selector '{css}': {e:?}")))
}

/// Pull a row out of every `<result>` element. Attribute names keep the case
/// the feed uses, and unclosed wrapper tags from the surrounding page are tolerated.
fn parse_result_feed(text: &str) -> Result<Vec<Row>> {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(false);

    let mut rows = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e))
                if e.local_name().as_ref().eq_ignore_ascii_case(b"result") =>
            {
                rows.push(result_row(&e)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) if !rows.is_empty() => {
                warn!(
                    "Stopped reading result feed at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            Err(e) => {
                return Err(ScraperError::parse(format!(
                    "malformed result feed at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }
    Ok(rows)
}

fn result_row(element: &BytesStart<'_>) -> Result<Row> {
    let mut row = Row::new();
    for attr in element.html_attributes() {
        let attr =
            attr.map_err(|e| ScraperError::parse(format!("bad attribute on <result>: {e}")))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        row.insert(name, value);
    }
    Ok(row)
}

fn parse_json(text: &str) -> Result<Vec<Row>> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| ScraperError::parse(format!("response was not valid JSON: {e}")))?;

    match parsed {
        Value::Array(items) => items.iter().map(json_row).collect(),
        Value::Object(ref map) => match map.get("results") {
            Some(Value::Array(items)) => items.iter().map(json_row).collect(),
            _ => Ok(vec![json_row(&parsed)?]),
        },
        _ => Err(ScraperError::parse("JSON payload was not a list or object")),
    }
}

fn json_row(value: &Value) -> Result<Row> {
    let map = value
        .as_object()
        .ok_or_else(|| ScraperError::parse("result row must be a JSON object"))?;
    Ok(map
        .iter()
        .map(|(k, v)| (k.clone(), json_cell(v)))
        .collect())
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fill blank header cells and make repeated names distinct.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("column_{}", i + 1)
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 2;
        while headers.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        headers.push(candidate);
    }
    headers
}

fn parse_html_table(text: &str) -> Result<Vec<Row>> {
    let document = Html::parse_document(text);
    let table_sel = selector("table")?;
    let tr_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;
    let cell_sel = selector("th, td")?;

    for table in document.select(&table_sel) {
        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for tr in table.select(&tr_sel) {
            let has_data = tr.select(&td_sel).next().is_some();
            if header.is_none() && !has_data {
                let ths: Vec<String> = tr.select(&th_sel).map(cell_text).collect();
                if !ths.is_empty() {
                    header = Some(unique_headers(ths));
                }
                continue;
            }
            if !has_data {
                continue;
            }

            let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
            if header.is_none() {
                header = Some(unique_headers(cells));
                continue;
            }
            let columns = header.as_deref().unwrap_or_default();

            let mut row = Row::new();
            for (i, column) in columns.iter().enumerate() {
                row.insert(column.clone(), cells.get(i).cloned().unwrap_or_default());
            }
            for (i, extra) in cells.iter().enumerate().skip(columns.len()) {
                row.insert(format!("column_{}", i + 1), extra.clone());
            }
            rows.push(row);
        }

        if !rows.is_empty() {
            return Ok(rows);
        }
    }

    Err(ScraperError::parse("no recognizable results table in HTML page"))
}

fn parse_csv(text: &str) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ScraperError::parse(format!("unreadable CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ScraperError::parse("CSV payload missing headers"));
    }
    let headers = unique_headers(headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ScraperError::parse(format!("bad CSV record: {e}")))?;
        let mut row = Row::new();
        for (i, column) in headers.iter().enumerate() {
            row.insert(column.clone(), record.get(i).unwrap_or_default());
        }
        rows.push(row);
    }
    Ok(rows)
}
