use serde::Serialize;
use std::fmt;

/// An image format the API can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageType {
    pub name: &'static str,
    pub mime_type: &'static str,
    pub file_extension: &'static str,
}

impl ImageType {
    pub const PNG: ImageType =
        ImageType { name: "PNG", mime_type: "image/png", file_extension: "png" };

    pub const GEOTIFF: ImageType =
        ImageType { name: "GEOTIFF", mime_type: "image/tiff", file_extension: "tif" };

    /// Every supported image type.
    pub fn all() -> &'static [ImageType] {
        IMAGE_TYPES
    }

    /// First image type whose MIME type is exactly `mime_type`.
    pub fn lookup_by_mime_type(mime_type: &str) -> Option<&'static ImageType> {
        IMAGE_TYPES.iter().find(|t| t.mime_type == mime_type)
    }

    /// First image type whose symbolic name is exactly `name`.
    pub fn lookup_by_name(name: &str) -> Option<&'static ImageType> {
        IMAGE_TYPES.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.mime_type)
    }
}

static IMAGE_TYPES: &[ImageType] = &[ImageType::PNG, ImageType::GEOTIFF];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_mime_type() {
        assert_eq!(ImageType::lookup_by_mime_type("image/png"), Some(&ImageType::PNG));
        assert_eq!(ImageType::lookup_by_mime_type("image/tiff"), Some(&ImageType::GEOTIFF));
        assert!(ImageType::lookup_by_mime_type("unexistent/xyz").is_none());
    }

    #[test]
    fn lookup_by_mime_type_is_case_sensitive() {
        assert!(ImageType::lookup_by_mime_type("IMAGE/PNG").is_none());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ImageType::lookup_by_name("GEOTIFF"), Some(&ImageType::GEOTIFF));
        assert!(ImageType::lookup_by_name("ZOOMOOO").is_none());
        assert!(ImageType::lookup_by_name("png").is_none());
    }

    #[test]
    fn registry_entries_are_unique() {
        let all = ImageType::all();
        assert_eq!(all.len(), 2);
        for t in all {
            assert_eq!(ImageType::lookup_by_name(t.name), Some(t));
            assert_eq!(ImageType::lookup_by_mime_type(t.mime_type), Some(t));
        }
    }

    #[test]
    fn display() {
        assert_eq!(ImageType::PNG.to_string(), "PNG (image/png)");
    }
}
