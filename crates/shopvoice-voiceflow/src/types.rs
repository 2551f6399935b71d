//! Request bodies for the knowledge-base document upload endpoints.

use serde::Serialize;

/// Which table columns are embedded for retrieval and which ride along as
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub searchable_fields: Vec<String>,
    pub metadata_fields: Vec<String>,
}

/// Schema for product rows built from `NormalizedRecord`.
#[must_use]
pub fn product_table_schema() -> TableSchema {
    let owned = |fields: &[&str]| fields.iter().map(|f| (*f).to_owned()).collect();
    TableSchema {
        searchable_fields: owned(&[
            "ProductName",
            "ProductDescription",
            "ProductVariants",
            "ProductTagsStr",
            "Availability",
        ]),
        metadata_fields: owned(&[
            "ProductID",
            "ProductPrice",
            "ProductURL",
            "ProductImages",
            "ProductTags",
            "CustomTag",
        ]),
    }
}

/// `POST /v1/knowledge-base/docs/upload/table` body.
#[derive(Debug, Serialize)]
pub(crate) struct TableUploadRequest<'a, T: Serialize> {
    pub data: TableData<'a, T>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TableData<'a, T: Serialize> {
    pub schema: &'a TableSchema,
    pub name: &'a str,
    pub items: &'a [T],
}

/// `POST /v1/knowledge-base/docs/upload` body for a URL document.
#[derive(Debug, Serialize)]
pub(crate) struct UrlUploadRequest<'a> {
    pub data: UrlData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UrlData<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: &'a str,
}
