//! Image data uploaded as part of API calls.

use crate::serde::*;
use std::fmt;
use tansy_errors::*;

/// The format of an image uploaded to the service.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}
impl ImageFormat {
    fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }

    fn sniff(data: &[u8]) -> Option<ImageFormat> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(b"\xff\xd8\xff") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }
}

/// An encoded image to be uploaded, such as a guild icon.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct ImageData {
    format: ImageFormat,
    data: Vec<u8>,
}
impl ImageData {
    /// Creates image data from an encoded image, detecting the format from its contents.
    pub fn new(data: impl Into<Vec<u8>>) -> Result<ImageData> {
        let data = data.into();
        let format = ImageFormat::sniff(&data)
            .invalid_input("Image must be GIF, PNG or JPEG.")?;
        Ok(ImageData { format, data })
    }

    /// Returns the format of this image.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the raw encoded contents of this image.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encodes this image as a base64 data URI, the form the API expects for image uploads.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), base64::encode(&self.data))
    }
}
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}
impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, s: S) -> StdResult<S::Ok, S::Error> {
        s.serialize_str(&self.to_data_uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00";

    #[test]
    fn formats_are_sniffed_from_magic_bytes() {
        assert_eq!(ImageData::new(PNG_HEADER).unwrap().format(), ImageFormat::Png);
        assert_eq!(ImageData::new(&b"\xff\xd8\xff\xe0"[..]).unwrap().format(), ImageFormat::Jpeg);
        assert_eq!(ImageData::new(&b"GIF89a\x01"[..]).unwrap().format(), ImageFormat::Gif);
    }

    #[test]
    fn unrecognized_data_is_rejected() {
        let err = ImageData::new(&b"BM\x00\x00"[..]).unwrap_err();
        assert!(err.is_error());
    }

    #[test]
    fn data_uris_carry_the_mime_type() {
        let image = ImageData::new(PNG_HEADER).unwrap();
        let uri = image.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(base64::decode(&uri["data:image/png;base64,".len()..]).unwrap(), PNG_HEADER);
    }
}
