/// Log line fragments written by the generator once a result page exists.
pub const COMPLETION_MARKERS: &[&str] = &[
    "HTML结果页面生成完成",
    "HTML页面生成完成",
    "HTML页面已准备就绪",
    "page generated",
    "html ready",
];

pub fn is_completion_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    COMPLETION_MARKERS
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::is_completion_message;

    #[test]
    fn matches_generator_log_lines() {
        assert!(is_completion_message("📄 HTML结果页面生成完成: 5d41402a"));
        assert!(is_completion_message("✅ HTML页面生成完成"));
        assert!(is_completion_message("Result Page Generated for keyword"));
    }

    #[test]
    fn ignores_progress_lines() {
        assert!(!is_completion_message("⏳ 等待HTML页面生成..."));
        assert!(!is_completion_message("📄 HTML页面生成中，提供状态查询"));
    }
}
