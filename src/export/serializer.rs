// ==========================================
// Repair Queens - 导出序列化
// ==========================================
// 职责: ExportBundle → CSV / JSON / HTML（PDF 替代）文件
// 文件名: {资源类型}_{YYYYMMDD_HHmm}.{扩展名}，时间取序列化时刻（本地时间）
// ==========================================

use crate::domain::export::{ExportBundle, Record};
use crate::domain::types::{ExportFormat, ResourceType};
use crate::export::error::{ExportError, ExportResult};
use crate::export::sink::ExportFile;
use chrono::NaiveDateTime;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

/// HTML 导出每种资源最多展示的行数
pub const DEFAULT_PDF_ROW_LIMIT: usize = 50;

/// 文件名时间戳: YYYYMMDD_HHmm
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d_%H%M").to_string()
}

pub fn export_filename(stem: &str, at: NaiveDateTime, format: ExportFormat) -> String {
    format!("{}_{}.{}", stem, format_timestamp(at), format.extension())
}

/// 表头字段: 取第一条记录的字段顺序
fn headers_of(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

// ==========================================
// CSV
// ==========================================

/// CSV 单元格
///
/// - 字符串: 双引号包裹，内部引号加倍，换行替换为空格
/// - 数值/布尔: 字面值
/// - null / 缺失: 空串
/// - 嵌套对象/数组: 以紧凑 JSON 文本按字符串处理
pub fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => quote_csv_string(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => quote_csv_string(&nested.to_string()),
    }
}

fn quote_csv_string(s: &str) -> String {
    let flattened = s.replace("\r\n", " ").replace(['\n', '\r'], " ");
    format!("\"{}\"", flattened.replace('"', "\"\""))
}

/// CSV 表头: 含逗号、引号或换行时按字符串转义，否则原样输出
fn csv_header(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        quote_csv_string(name)
    } else {
        name.to_string()
    }
}

/// 序列化为 CSV; 空记录集返回 None（不生成文件）
pub fn to_csv(records: &[Record]) -> ExportResult<Option<String>> {
    let headers = headers_of(records);
    if headers.is_empty() {
        return Ok(None);
    }

    // 单元格已自行转义，写出器只负责拼接分隔符与换行
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers.iter().map(|h| csv_header(h)))?;
    for record in records {
        let row: Vec<String> = headers.iter().map(|h| csv_cell(record.get(h))).collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Serialization(e.to_string()))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| ExportError::Serialization(e.to_string()))
}

// ==========================================
// JSON
// ==========================================

/// 序列化为 JSON（2 空格缩进）
pub fn to_json(records: &[Record]) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

// ==========================================
// HTML（PDF 替代）
// ==========================================

/// snake_case → Title Case
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape_html(s),
        Some(other) => escape_html(&other.to_string()),
    }
}

fn html_section(resource: ResourceType, records: &[Record], row_limit: usize) -> String {
    let mut html = format!(
        "<h2>{} ({} records)</h2>\n",
        resource.title(),
        records.len()
    );

    let headers = headers_of(records);
    if headers.is_empty() {
        html.push_str("<p class=\"no-data\">No data available</p>\n");
        return html;
    }

    html.push_str("<table>\n<thead><tr>");
    for header in &headers {
        html.push_str(&format!("<th>{}</th>", escape_html(&title_case(header))));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for record in records.iter().take(row_limit) {
        html.push_str("<tr>");
        for header in &headers {
            html.push_str(&format!("<td>{}</td>", html_cell(record.get(header))));
        }
        html.push_str("</tr>\n");
    }

    if records.len() > row_limit {
        html.push_str(&format!(
            "<tr class=\"summary\"><td colspan=\"{}\">... and {} more records</td></tr>\n",
            headers.len(),
            records.len() - row_limit
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// 生成合并的 HTML 文档（每种资源一个标题 + 表格）
pub fn to_html(bundle: &ExportBundle, generated_at: NaiveDateTime, row_limit: usize) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Repair Queens - Data Export</title>\n<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         table { border-collapse: collapse; width: 100%; margin-bottom: 24px; }\n\
         th, td { border: 1px solid #ddd; padding: 6px; font-size: 12px; text-align: left; }\n\
         th { background: #f4f4f4; }\n\
         .summary td { font-style: italic; color: #666; }\n\
         .no-data { color: #999; }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str("<h1>Repair Queens - Data Export</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Generated: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M")
    ));

    for (resource, records) in bundle.iter() {
        html.push_str(&html_section(resource, records, row_limit));
    }

    html.push_str("</body>\n</html>\n");
    html
}

// ==========================================
// 整包序列化
// ==========================================

/// 按格式序列化整个数据包
///
/// - csv/json: 每种资源一个文件（CSV 跳过空资源）
/// - pdf: 一个合并 HTML 文件，文件名前缀为各资源标签以 '-' 连接
pub fn serialize_bundle(
    bundle: &ExportBundle,
    format: ExportFormat,
    at: NaiveDateTime,
    row_limit: usize,
) -> ExportResult<Vec<ExportFile>> {
    let mut files = Vec::new();

    match format {
        ExportFormat::Csv => {
            for (resource, records) in bundle.iter() {
                if let Some(content) = to_csv(records)? {
                    files.push(ExportFile {
                        filename: export_filename(resource.tag(), at, format),
                        mime_type: format.mime_type().to_string(),
                        content,
                    });
                }
            }
        }
        ExportFormat::Json => {
            for (resource, records) in bundle.iter() {
                files.push(ExportFile {
                    filename: export_filename(resource.tag(), at, format),
                    mime_type: format.mime_type().to_string(),
                    content: to_json(records)?,
                });
            }
        }
        ExportFormat::Pdf => {
            let stem = bundle
                .resource_types()
                .map(|r| r.tag())
                .collect::<Vec<_>>()
                .join("-");
            files.push(ExportFile {
                filename: export_filename(&stem, at, format),
                mime_type: format.mime_type().to_string(),
                content: to_html(bundle, at, row_limit),
            });
        }
    }

    Ok(files)
}
