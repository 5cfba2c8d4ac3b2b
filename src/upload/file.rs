//! Uploaded file records and the per-route upload field set.

use bytes::Bytes;

use crate::registry::MethodDescriptor;

/// One file received in a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Multipart field the file arrived under.
    pub field_name: String,
    /// Client supplied file name.
    pub file_name: String,
    /// Declared content type of the part, if any.
    pub content_type: Option<String>,
    /// Buffered file contents.
    pub data: Bytes,
}

impl UploadedFile {
    /// Size of the buffered contents in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A multipart field the upload gate accepts files for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadField {
    pub name: String,
    pub max_count: usize,
}

/// Derive the accepted file fields from a descriptor's file-typed bindings.
///
/// Single-file bindings accept exactly one file. Multi-file bindings use the
/// binding's own limit, falling back to `default_max`.
pub fn upload_fields(descriptor: &MethodDescriptor, default_max: usize) -> Vec<UploadField> {
    if !descriptor.has_file_params() {
        return Vec::new();
    }

    descriptor
        .request_params()
        .filter(|param| param.options.file)
        .map(|param| UploadField {
            name: param.name.clone(),
            max_count: if param.options.multiple {
                param.options.max_count.unwrap_or(default_max)
            } else {
                1
            },
        })
        .collect()
}
