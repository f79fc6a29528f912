//! AI-assisted breaking news generation
//!
//! Calls the Gemini `generateContent` REST endpoint with Google Search
//! grounding to draft breaking-news summaries for a topic, and offers a
//! spell-check advisory for operator input. Generation runs on the
//! operator surface; the daemon only ever receives the confirmed list.

use color_eyre::eyre::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use super::HTTP_CLIENT;
use crate::config::AiConfig;

/// Topic keywords that switch the prompt to storm-priority reporting.
const STORM_KEYWORDS: &[&str] = &[
    "bão",
    "áp thấp",
    "lũ",
    "lụt",
    "thiên tai",
    "storm",
    "typhoon",
    "hurricane",
    "cyclone",
];

/// One generated news entry offered to the operator for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiNewsItem {
    pub headline: String,
    pub summary: String,
}

/// A cited source page, deduplicated by URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub uri: String,
    pub title: String,
}

/// Result of one generation request.
#[derive(Debug, Clone)]
pub struct GeneratedNews {
    pub items: Vec<AiNewsItem>,
    pub sources: Vec<SourceRef>,
}

// Request/response shapes for the generateContent endpoint

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<serde_json::Value>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata", default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

fn api_key(ai: &AiConfig) -> Result<String> {
    std::env::var(&ai.api_key_env).with_context(|| {
        format!(
            "API key is missing. Please set the {} environment variable.",
            ai.api_key_env
        )
    })
}

fn endpoint(ai: &AiConfig) -> String {
    format!(
        "{base}/models/{model}:generateContent",
        base = ai.endpoint.trim_end_matches('/'),
        model = ai.model
    )
}

fn is_storm_topic(topic: &str) -> bool {
    let lower = topic.to_lowercase();
    STORM_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn build_news_prompt(topic: &str, count: Option<u32>, hours: u32) -> String {
    let quantity = count.map_or_else(
        || "một danh sách gồm các bản tóm tắt tin tức khác nhau".to_string(),
        |n| format!("một danh sách gồm {n} bản tóm tắt tin tức khác nhau"),
    );

    let storm_block = if is_storm_topic(topic) {
        "YÊU CẦU ƯU TIÊN CHO TIN BÃO:\n\
         - Các tin đầu tiên: Phải tập trung vào các thông tin định lượng quan trọng nhất: \
         vị trí chính xác của tâm bão (kinh độ, vĩ độ), sức gió mạnh nhất, hướng và tốc độ \
         di chuyển. Cung cấp dự báo lượng mưa cụ thể cho các tỉnh/thành phố trong vùng ảnh hưởng.\n\
         - Các tin tiếp theo: Cập nhật về công tác chỉ đạo, ứng phó của chính quyền, di dời dân, \
         và các thiệt hại (nếu có).\n\n"
    } else {
        ""
    };

    format!(
        "YÊU CẦU CỰC KỲ QUAN TRỌNG: Chỉ sử dụng Google Search để tìm các tin tức NÓNG HỔI, \
         được công bố TRONG VÒNG TỐI ĐA {hours} GIỜ GẦN ĐÂY NHẤT về chủ đề \"{topic}\". \
         Bất kỳ thông tin nào cũ hơn {hours} giờ đều bị coi là KHÔNG HỢP LỆ và phải được loại bỏ \
         hoàn toàn. Dựa vào kết quả tìm được, hãy đóng vai một biên tập viên và tạo ra {quantity}.\n\n\
         {storm_block}\
         Mỗi mục trong danh sách phải là một đối tượng JSON chứa:\n\
         1. \"headline\": một tiêu đề tin tức rất ngắn gọn, hấp dẫn, VIẾT HOA.\n\
         2. \"summary\": một bản tóm tắt chi tiết hơn (1-2 câu) cung cấp nội dung chính của tin.\n\n\
         QUAN TRỌNG: Chỉ trả về một mảng JSON của các đối tượng này. ĐẢM BẢO TUYỆT ĐỐI JSON HỢP LỆ. \
         Bất kỳ chuỗi nào chứa dấu ngoặc kép (\") phải được thoát đúng cách (\\\"). \
         Phản hồi của bạn phải bắt đầu bằng '[' và kết thúc bằng ']'. \
         Không thêm bất kỳ ký tự nào khác, không có markdown, không có lời giải thích."
    )
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Cut the outermost JSON array out of the model's raw text.
fn extract_json_array(raw: &str) -> Result<&str> {
    let start = raw.find('[');
    let end = raw.rfind(']');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&raw[s..=e]),
        _ => bail!("AI đã trả về dữ liệu không chứa một mảng JSON hợp lệ."),
    }
}

/// Collect cited web sources, deduplicated by URI in citation order.
fn collect_sources(response: &GenerateResponse) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    let chunks = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.as_slice())
        .unwrap_or_default();

    for chunk in chunks {
        let Some(web) = &chunk.web else { continue };
        let Some(uri) = web.uri.clone() else { continue };
        if !seen.insert(uri.clone()) {
            continue;
        }
        let title = web
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| host_of(&uri));
        sources.push(SourceRef { uri, title });
    }
    sources
}

/// Hostname fallback when a source has no title.
fn host_of(uri: &str) -> String {
    let without_scheme = uri.split("://").nth(1).unwrap_or(uri);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

async fn call_model(ai: &AiConfig, request: &GenerateRequest<'_>) -> Result<GenerateResponse> {
    let key = api_key(ai)?;
    let response = HTTP_CLIENT
        .post(endpoint(ai))
        .header("x-goog-api-key", key)
        .json(request)
        .send()
        .await
        .context("Failed to reach the AI endpoint")?;
    if !response.status().is_success() {
        bail!("AI endpoint answered {}", response.status());
    }
    response
        .json()
        .await
        .context("AI response was not valid JSON")
}

/// Generate breaking-news candidates for a topic.
///
/// # Errors
/// Any failure (missing key, HTTP, no JSON array, unparseable array, empty
/// result) is returned as an error; the caller surfaces it and mutates no
/// state.
pub async fn generate_breaking_news(
    ai: &AiConfig,
    topic: &str,
    count: Option<u32>,
    hours: u32,
) -> Result<GeneratedNews> {
    let prompt = build_news_prompt(topic, count, hours);
    let request = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: &prompt }],
        }],
        tools: Some(serde_json::json!([{ "googleSearch": {} }])),
        generation_config: None,
    };

    let response = call_model(ai, &request).await?;
    let raw = response_text(&response);
    debug!(bytes = raw.len(), "AI raw response");

    let json = extract_json_array(&raw)?;
    let items: Vec<AiNewsItem> = serde_json::from_str(json)
        .map_err(|_| color_eyre::eyre::eyre!("AI đã trả về dữ liệu không hợp lệ. Vui lòng thử lại."))?;
    if items.is_empty() {
        bail!("AI không thể tạo tóm tắt tin tức từ chủ đề được cung cấp.");
    }

    let sources = collect_sources(&response);
    info!(items = items.len(), sources = sources.len(), "Generated breaking news");
    Ok(GeneratedNews { items, sources })
}

/// Spell-check a Vietnamese phrase. Returns a suggestion only when the
/// model produced a different, non-empty phrase.
///
/// # Errors
/// Returns an error on request failure; callers treat it as "no suggestion".
pub async fn check_spelling(ai: &AiConfig, text: &str) -> Result<Option<String>> {
    let prompt = format!(
        "Correct any spelling or grammatical errors in the following Vietnamese phrase. \
         If it is already correct, return the original phrase. \
         Only return the corrected phrase, nothing else. Phrase: \"{text}\""
    );
    let request = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: &prompt }],
        }],
        tools: None,
        generation_config: Some(serde_json::json!({ "temperature": 0 })),
    };

    let response = call_model(ai, &request).await?;
    let corrected = response_text(&response).trim().replace('"', "");

    if !corrected.is_empty() && corrected.to_lowercase() != text.to_lowercase() {
        Ok(Some(corrected))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_storm_topics_detected() {
        assert!(is_storm_topic("Bão số 5 Biển Đông"));
        assert!(is_storm_topic("nguy cơ LŨ quét"));
        assert!(!is_storm_topic("giá vàng hôm nay"));
    }

    #[test]
    fn test_prompt_includes_window_and_topic() {
        let prompt = build_news_prompt("giá vàng", None, 3);
        assert!(prompt.contains("TỐI ĐA 3 GIỜ"));
        assert!(prompt.contains("\"giá vàng\""));
        assert!(!prompt.contains("TIN BÃO"));
    }

    #[test]
    fn test_prompt_storm_block_and_count() {
        let prompt = build_news_prompt("bão Yagi", Some(4), 6);
        assert!(prompt.contains("TIN BÃO"));
        assert!(prompt.contains("gồm 4 bản tóm tắt"));
    }

    #[test]
    fn test_extract_json_array_from_noisy_text() {
        let raw = "Here you go:\n[{\"headline\":\"H\",\"summary\":\"S\"}]\nthanks";
        assert_eq!(
            extract_json_array(raw).expect("array"),
            "[{\"headline\":\"H\",\"summary\":\"S\"}]"
        );
    }

    #[test]
    fn test_extract_json_array_rejects_missing_brackets() {
        assert!(extract_json_array("no array here").is_err());
        assert!(extract_json_array("] backwards [").is_err());
    }

    #[test]
    fn test_collect_sources_dedups_by_uri() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "[]"}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"uri": "https://a.vn/x", "title": "Báo A"}},
                        {"web": {"uri": "https://a.vn/x", "title": "Báo A (lặp)"}},
                        {"web": {"uri": "https://b.vn/y", "title": ""}},
                        {"web": null}
                    ]}
                }]
            }"#,
        )
        .expect("deserialize");
        let sources = collect_sources(&response);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Báo A");
        // Untitled source falls back to its hostname
        assert_eq!(sources[1].title, "b.vn");
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "[{"}, {"text": "}]"}]}}]}"#,
        )
        .expect("deserialize");
        assert_eq!(response_text(&response), "[{}]");
    }
}
