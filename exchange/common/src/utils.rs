use std::borrow::Cow;

/// payloads longer than this are cut before they reach the logs
pub const TRUNC_LENGTH: usize = 3072;

/// Cut `src` to [`TRUNC_LENGTH`] bytes and mark the cut with `...`.
pub fn truncate(src: &[u8]) -> Cow<'_, [u8]> {
    if src.len() > TRUNC_LENGTH {
        let mut result = src[..TRUNC_LENGTH].to_vec();
        result.extend_from_slice(b"...");
        Cow::Owned(result)
    } else {
        Cow::Borrowed(src)
    }
}

/// [`truncate`] rendered lossily as text, for log fields
pub fn truncate_lossy(src: &[u8]) -> String {
    String::from_utf8_lossy(&truncate(src)).into_owned()
}
