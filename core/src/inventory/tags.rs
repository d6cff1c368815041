use dicom_core::Tag;
use dicom_object::InMemDicomObject;

pub use dicom_dictionary_std::tags::{
    MODALITY, PIXEL_DATA, PROTOCOL_NAME, SERIES_DESCRIPTION, SERIES_INSTANCE_UID, SERIES_NUMBER,
};

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string.
/// Trailing UID padding is removed along with whitespace.
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn test_tag_values() {
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
        assert_eq!(PROTOCOL_NAME, Tag(0x0018, 0x1030));
        assert_eq!(SERIES_INSTANCE_UID, Tag(0x0020, 0x000E));
        assert_eq!(SERIES_NUMBER, Tag(0x0020, 0x0011));
    }

    #[test]
    fn test_value_helpers() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("t1_mprage_cor_ND "),
        ));
        dcm.put(DataElement::new(
            SERIES_NUMBER,
            VR::IS,
            PrimitiveValue::from("7"),
        ));

        assert_eq!(
            get_string_value(&dcm, SERIES_DESCRIPTION).as_deref(),
            Some("t1_mprage_cor_ND")
        );
        assert_eq!(get_int_value(&dcm, SERIES_NUMBER), Some(7));
        assert_eq!(get_string_value(&dcm, PROTOCOL_NAME), None);
        assert_eq!(get_int_value(&dcm, PROTOCOL_NAME), None);
    }
}
