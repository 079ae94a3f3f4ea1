use error_stack::ResultExt;
use serde::de::DeserializeOwned;

use crate::errors::{CustomResult, ParsingError};

/// Parse a byte slice into a typed structure, tagging failures with the
/// target type name.
pub trait ByteSliceExt {
    fn parse_struct<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError>;
}

impl ByteSliceExt for [u8] {
    fn parse_struct<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError> {
        serde_json::from_slice(self)
            .change_context(ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| {
                format!("Unable to parse {type_name} from the given bytes")
            })
    }
}

/// Parse an owned `serde_json::Value` into a typed structure.
pub trait ValueExt {
    fn parse_value<T: DeserializeOwned>(
        self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError>;
}

impl ValueExt for serde_json::Value {
    fn parse_value<T: DeserializeOwned>(
        self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError> {
        serde_json::from_value(self).change_context(ParsingError::StructParseFailure(type_name))
    }
}
