//! Photo encoding: [`Photo`] → wrapped base64 PNG text.
//!
//! The diary endpoint takes photos as strings inside the JSON body. Each
//! photo is PNG-encoded (lossless, and byte-for-byte repeatable for the
//! same pixels), base64-encoded with the standard alphabet, then broken into
//! fixed-width lines separated by CR LF. There is no separator after the
//! last line.

use super::photo::Photo;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use std::io::Cursor;
use tracing::{debug, warn};

/// Line separator inserted between wrapped base64 lines.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Encode a photo for submission.
///
/// Returns `None` when no photo was provided (a cancelled pick) or when the
/// image cannot be written as PNG. Either way nothing should be appended to
/// the encoded photo list.
pub fn encode_photo(photo: Option<&Photo>, line_length: usize) -> Option<String> {
    let photo = photo?;

    let mut buf = Vec::new();
    if let Err(e) = photo
        .image()
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
    {
        warn!("Photo could not be PNG-encoded, not attaching it: {}", e);
        return None;
    }

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded photo → {} bytes PNG, {} chars base64", buf.len(), b64.len());

    Some(wrap_lines(&b64, line_length))
}

/// Break `text` into lines of `line_length` characters joined by
/// [`LINE_SEPARATOR`]. A length of 0 disables wrapping.
///
/// `text` must be ASCII (base64 always is).
pub fn wrap_lines(text: &str, line_length: usize) -> String {
    if line_length == 0 || text.len() <= line_length {
        return text.to_string();
    }

    let breaks = (text.len() - 1) / line_length;
    let mut out = String::with_capacity(text.len() + breaks * LINE_SEPARATOR.len());
    let mut start = 0;
    while start < text.len() {
        let end = (start + line_length).min(text.len());
        if start > 0 {
            out.push_str(LINE_SEPARATOR);
        }
        out.push_str(&text[start..end]);
        start = end;
    }
    out
}
