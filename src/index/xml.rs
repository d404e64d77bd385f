//! Field access helpers shared by the two index parsers.

use roxmltree::Node;

use super::{IndexError, IndexKind};

/// XML namespace used by AVID index files.
pub const AVID_NAMESPACE: &str = "http://www.sa.dk/xmlns/diark/1.0";

/// Element children of the root; one per index record.
pub fn records<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.root_element().children().filter(|n| n.is_element())
}

/// Text of the first descendant `field` element of `record`.
///
/// An element without text yields an empty string; a missing element is an
/// error naming the field.
pub fn field<'a>(
    record: Node<'a, '_>,
    kind: IndexKind,
    index: usize,
    name: &'static str,
) -> Result<&'a str, IndexError> {
    record
        .descendants()
        .find(|n| n.has_tag_name((AVID_NAMESPACE, name)))
        .map(|n| n.text().unwrap_or("").trim())
        .ok_or(IndexError::MissingField {
            kind,
            record: index,
            field: name,
        })
}

/// Like [`field`], but an empty value counts as missing.
pub fn required_field<'a>(
    record: Node<'a, '_>,
    kind: IndexKind,
    index: usize,
    name: &'static str,
) -> Result<&'a str, IndexError> {
    match field(record, kind, index, name)? {
        "" => Err(IndexError::MissingField {
            kind,
            record: index,
            field: name,
        }),
        value => Ok(value),
    }
}

pub fn parse(xml: &str, kind: IndexKind) -> Result<roxmltree::Document<'_>, IndexError> {
    roxmltree::Document::parse(xml).map_err(|source| IndexError::Xml {
        kind,
        path: None,
        source,
    })
}
