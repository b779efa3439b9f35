//! 课件文件魔术字节校验

const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// 验证课件内容的魔术字节是否与扩展名匹配
///
/// `extension` 需包含点号，如 ".pdf"。未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF"),
        // PowerPoint 97-2003
        ".ppt" => data.starts_with(OLE_MAGIC),
        // OOXML / Keynote / OpenDocument 都是 ZIP 容器
        ".pptx" | ".key" | ".odp" | ".zip" => data.starts_with(ZIP_MAGIC),
        _ => false,
    }
}

/// 从文件名中提取小写扩展名（包含点号）
pub fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}
