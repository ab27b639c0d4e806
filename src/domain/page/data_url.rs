//! 自包含的页面编码 (`data:<mime>;base64,<payload>`)
//!
//! 仅在没有持久缓存时使用

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

const DEFAULT_MIME: &str = "image/png";

pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// 解析 data URL，返回 `(mime, bytes)`
///
/// 缺少 mime 时按 `image/png` 处理；格式不符或 base64 无效返回 `None`
pub fn decode_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME);
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}
