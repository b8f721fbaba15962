use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// DataRecord – one row of the data block
// ---------------------------------------------------------------------------

/// A single measurement point of the data block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataRecord {
    /// Scattering vector q (x).
    pub scattering_vector: f64,
    /// Intensity at q (y).
    pub counts_per_area: f64,
}

// ---------------------------------------------------------------------------
// DataTable – the complete data block
// ---------------------------------------------------------------------------

/// The data block of a PDH file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub records: Vec<DataRecord>,
}

impl DataTable {
    pub fn new(records: Vec<DataRecord>) -> Self {
        Self { records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataRecord> {
        self.records.iter()
    }

    /// The `scattering_vector` column.
    pub fn scattering_vector(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.scattering_vector).collect()
    }

    /// The `counts_per_area` column.
    pub fn counts_per_area(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.counts_per_area).collect()
    }

    /// Smallest and largest scattering vector, `None` for an empty table.
    pub fn q_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.records.iter().map(|r| r.scattering_vector);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), q| (lo.min(q), hi.max(q))))
    }
}

impl<'a> IntoIterator for &'a DataTable {
    type Item = &'a DataRecord;
    type IntoIter = std::slice::Iter<'a, DataRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// XML tree – the metadata footer
// ---------------------------------------------------------------------------

/// The `<?xml ...?>` declaration, when the footer carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// A child of an element. Text is stored trimmed; whitespace-only text is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<XmlAttribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// All child elements called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// This element and all elements below it, depth first.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            out.push(el);
            let children: Vec<&XmlElement> = el.elements().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// The metadata footer as a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<XmlDeclaration>,
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Number of elements in the tree, root included.
    pub fn element_count(&self) -> usize {
        self.root.descendants().len()
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}=\"{}\"", attr.name, attr.value)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(q: f64, i: f64) -> DataRecord {
        DataRecord {
            scattering_vector: q,
            counts_per_area: i,
        }
    }

    #[test]
    fn test_columns_follow_row_order() {
        let table = DataTable::new(vec![record(0.3, 3.0), record(0.1, 1.0), record(0.2, 2.0)]);
        assert_eq!(table.scattering_vector(), vec![0.3, 0.1, 0.2]);
        assert_eq!(table.counts_per_area(), vec![3.0, 1.0, 2.0]);
        assert_eq!(table.q_range(), Some((0.1, 0.3)));
    }

    #[test]
    fn test_empty_table_has_no_range() {
        let table = DataTable::default();
        assert!(table.is_empty());
        assert_eq!(table.q_range(), None);
    }

    #[test]
    fn test_element_navigation() {
        let mut group = XmlElement::new("group");
        group.attributes.push(XmlAttribute {
            name: "id".to_string(),
            value: "Length".to_string(),
        });
        group.children.push(XmlNode::Text("12".to_string()));

        let mut root = XmlElement::new("root");
        root.children.push(XmlNode::Element(XmlElement::new("param")));
        root.children.push(XmlNode::Element(group));
        root.children.push(XmlNode::Element(XmlElement::new("param")));

        assert_eq!(root.children_named("param").count(), 2);
        let group = root.child("group").unwrap();
        assert_eq!(group.attribute("id"), Some("Length"));
        assert_eq!(group.attribute("missing"), None);
        assert_eq!(group.text(), "12");

        let names: Vec<&str> = root.descendants().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["root", "param", "group", "param"]);
    }
}
