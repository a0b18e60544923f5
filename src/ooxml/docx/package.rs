use crate::common::Metadata;
use crate::ooxml::custom_properties::CustomProperties;
use crate::ooxml::docx::document::Document;
use crate::ooxml::docx::parts::DocumentPart;
/// Package implementation for Word documents opened for extraction and surgical mutation.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Read, Seek};
use std::path::Path;

/// A Word (.docx) package.
///
/// Wraps an OPC package and exposes read access to the document along with
/// part-level mutation used by the atomic operation handlers. There is no
/// object-model writer here: every mutation rewrites the bytes of an
/// existing part in place rather than regenerating it from a model, since
/// operations must leave unrelated properties untouched.
pub struct Package {
    opc: OpcPackage,
    metadata: Metadata,
    custom_properties: CustomProperties,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let opc = OpcPackage::open(path)?;
        Self::from_opc_package(opc)
    }

    /// Create a Package from an already-parsed OPC package.
    pub fn from_opc_package(opc: OpcPackage) -> Result<Self> {
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main document part: {}", e)))?;

        let content_type = main_part.content_type();
        if content_type != ct::WML_DOCUMENT_MAIN {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        let custom_properties = crate::ooxml::custom_properties::extract_custom_properties(&opc)
            .unwrap_or_else(|_| CustomProperties::new());
        let metadata =
            crate::ooxml::metadata::extract_metadata(&opc).unwrap_or_else(|_| Metadata::default());

        Ok(Self {
            opc,
            metadata,
            custom_properties,
        })
    }

    /// Open a .docx package from a reader (must implement Read + Seek).
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let opc = OpcPackage::from_reader(reader)?;
        Self::from_opc_package(opc)
    }

    /// Get the main document for reading.
    pub fn document(&self) -> Result<Document<'_>> {
        let main_part = self
            .opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main document part: {}", e)))?;

        let doc_part = DocumentPart::from_part(main_part)?;
        Ok(Document::new(doc_part, &self.opc))
    }

    /// Get the underlying OPC package.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }

    /// Get mutable access to the underlying OPC package.
    ///
    /// The atomic operation handlers use this to locate a part, read its
    /// current bytes, apply a targeted string edit, and write the bytes
    /// back with `set_blob`.
    #[inline]
    pub fn opc_package_mut(&mut self) -> &mut OpcPackage {
        &mut self.opc
    }

    /// Read a part's XML content as a UTF-8 string, if present.
    pub fn part_xml(&self, uri: &str) -> Result<Option<String>> {
        let pack_uri =
            PackURI::new(uri).map_err(|e| OoxmlError::Other(format!("invalid uri {}: {}", uri, e)))?;
        match self.opc.get_part(&pack_uri) {
            Ok(part) => {
                let text = std::str::from_utf8(part.blob())
                    .map_err(|e| OoxmlError::Xml(format!("invalid UTF-8 in {}: {}", uri, e)))?;
                Ok(Some(text.to_string()))
            },
            Err(_) => Ok(None),
        }
    }

    /// Replace a part's XML content with new bytes, creating the part if needed.
    pub fn set_part_xml(&mut self, uri: &str, content_type: &str, xml: String) -> Result<()> {
        use crate::ooxml::opc::part::BlobPart;

        let pack_uri =
            PackURI::new(uri).map_err(|e| OoxmlError::Other(format!("invalid uri {}: {}", uri, e)))?;

        if let Ok(part) = self.opc.get_part_mut(&pack_uri) {
            part.set_blob(xml.into_bytes());
        } else {
            let part = BlobPart::new(pack_uri, content_type.to_string(), xml.into_bytes());
            self.opc.add_part(Box::new(part));
        }
        Ok(())
    }

    /// Save the package to a file, writing back every part's current bytes.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.opc
            .save(path)
            .map_err(|e| OoxmlError::Other(format!("failed to save package: {}", e)))
    }

    /// Get a reference to the document metadata (core properties).
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get a reference to the custom document properties.
    pub fn custom_properties(&self) -> &CustomProperties {
        &self.custom_properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore]
    fn test_open_package() {
        let result = Package::open("test.docx");
        assert!(result.is_ok());
    }
}
