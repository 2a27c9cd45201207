use bytes::BytesMut;

pub(crate) trait BufferWriter {
    fn write_to_buffer(&self, buffer: &mut BytesMut);
}

/// Returns the first character that cannot appear inside a single source
/// expression of a serialized policy.
#[inline]
pub(crate) fn find_forbidden_char(value: &str) -> Option<char> {
    value
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | ','))
}
