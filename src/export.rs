//! Writers for the two artifacts of a split: the data table and the metadata tree.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::data::model::{DataTable, XmlDocument, XmlElement, XmlNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Parquet,
}

impl DataFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Xml,
    Json,
}

impl MetadataFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MetadataFormat::Xml => "xml",
            MetadataFormat::Json => "json",
        }
    }
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

/// Write `table` to `path` in `format`.
pub fn write_data(table: &DataTable, format: DataFormat, path: &Path) -> Result<()> {
    match format {
        DataFormat::Csv => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_data_csv(table, BufWriter::new(file))
        }
        DataFormat::Parquet => write_data_parquet(table, path),
    }
}

/// CSV with a `scattering_vector,counts_per_area` header row.
pub fn write_data_csv<W: Write>(table: &DataTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in table {
        csv_writer.serialize(record).context("writing CSV row")?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Parquet file with two non-null `Float64` columns.
pub fn write_data_parquet(table: &DataTable, path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("scattering_vector", DataType::Float64, false),
        Field::new("counts_per_area", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(table.scattering_vector())),
        Arc::new(Float64Array::from(table.counts_per_area())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Metadata tree
// ---------------------------------------------------------------------------

/// Write `document` to `path` in `format`.
pub fn write_metadata(document: &XmlDocument, format: MetadataFormat, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        MetadataFormat::Xml => write_metadata_xml(document, &mut out)?,
        MetadataFormat::Json => write_metadata_json(document, &mut out)?,
    }
    out.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Indented XML, with the document's declaration when it has one.
pub fn write_metadata_xml<W: Write>(document: &XmlDocument, writer: W) -> Result<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    if let Some(decl) = &document.declaration {
        xml.write_event(Event::Decl(BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        )))
        .context("writing XML declaration")?;
    }
    write_element(&mut xml, &document.root)?;
    xml.get_mut().write_all(b"\n").context("writing XML")?;
    Ok(())
}

fn write_element<W: Write>(xml: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() {
        xml.write_event(Event::Empty(start))
            .with_context(|| format!("writing <{}/>", element.name))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))
        .with_context(|| format!("writing <{}>", element.name))?;
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(xml, el)?,
            XmlNode::Text(text) => xml
                .write_event(Event::Text(BytesText::new(text)))
                .with_context(|| format!("writing text of <{}>", element.name))?,
        }
    }
    xml.write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .with_context(|| format!("writing </{}>", element.name))?;
    Ok(())
}

/// The tree as pretty-printed JSON.
pub fn write_metadata_json<W: Write>(document: &XmlDocument, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, document).context("writing metadata JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DataRecord;
    use crate::data::xml::parse_document;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn table() -> DataTable {
        DataTable::new(vec![
            DataRecord { scattering_vector: 0.01, counts_per_area: 120.5 },
            DataRecord { scattering_vector: 0.02, counts_per_area: 98.25 },
        ])
    }

    const FOOTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fileinfo>
  <parameter id="Sample" note="a &lt; b">water &amp; salt</parameter>
  <group id="Detector"><flag/></group>
</fileinfo>"#;

    #[test]
    fn test_csv_has_named_header() {
        let mut out = Vec::new();
        write_data_csv(&table(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["scattering_vector,counts_per_area", "0.01,120.5", "0.02,98.25"]);
    }

    #[test]
    fn test_parquet_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.parquet");
        write_data(&table(), DataFormat::Parquet, &path).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 1);

        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 2);
        let q = batch
            .column(batch.schema().index_of("scattering_vector").unwrap())
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(q.value(1), 0.02);
    }

    #[test]
    fn test_xml_output_parses_to_same_tree() {
        let doc = parse_document(FOOTER).unwrap();
        let mut out = Vec::new();
        write_metadata_xml(&doc, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(parse_document(&text).unwrap(), doc);
    }

    #[test]
    fn test_json_output_keeps_attributes_and_text() {
        let doc = parse_document(FOOTER).unwrap();
        let mut out = Vec::new();
        write_metadata_json(&doc, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let parameter = &value["root"]["children"][0];
        assert_eq!(parameter["name"], "parameter");
        assert_eq!(parameter["attributes"][1]["value"], "a < b");
        assert_eq!(parameter["children"][0], "water & salt");
    }
}
